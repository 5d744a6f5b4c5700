//! Co-occurrence edges for a single document.
//!
//! # Overview
//!
//! An [`Edge`] is an unordered pair of distinct canonical entity names,
//! stored with the lexicographically smaller name first so that `(A, B)` and
//! `(B, A)` are the same value. Self-loops cannot be constructed.
//!
//! [`build_edges`] turns one document's normalized entity sequence into a
//! multiset of edges: every unordered pair of *positions* is considered, so
//! repeated mentions count as repeated evidence unless the
//! [`MentionPolicy`] says otherwise.
//!
//! # Mention policy
//!
//! | Policy | `n` mentions of A, `m` of B in one document |
//! |--------|---------------------------------------------|
//! | [`MentionPolicy::PerMention`] | `n × m` instances of `(A, B)` |
//! | [`MentionPolicy::PerDocument`] | 1 instance of `(A, B)` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Orient `x` and `y` canonically, or `None` when they are equal.
#[must_use]
pub fn canonical_pair<'a>(x: &'a str, y: &'a str) -> Option<(&'a str, &'a str)> {
    match x.cmp(y) {
        std::cmp::Ordering::Less => Some((x, y)),
        std::cmp::Ordering::Greater => Some((y, x)),
        std::cmp::Ordering::Equal => None,
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// An undirected co-occurrence edge between two distinct entities.
///
/// Invariant: `a < b`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    a: String,
    b: String,
}

impl Edge {
    /// Build the canonical edge between `x` and `y`.
    ///
    /// Returns `None` for a self-loop (`x == y`).
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Option<Self> {
        let x = x.into();
        let y = y.into();
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lexicographically smaller endpoint.
    #[must_use]
    pub fn a(&self) -> &str {
        &self.a
    }

    /// The lexicographically larger endpoint.
    #[must_use]
    pub fn b(&self) -> &str {
        &self.b
    }

    /// Both endpoints, smaller first.
    #[must_use]
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.a, self.b)
    }
}

// ---------------------------------------------------------------------------
// MentionPolicy
// ---------------------------------------------------------------------------

/// How repeated mentions inside one document contribute to edge weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MentionPolicy {
    /// Every pair of mention positions is a co-occurrence event.
    #[default]
    #[serde(rename = "mentions")]
    PerMention,
    /// Entities are deduplicated per document first: a document adds at
    /// most 1 to any edge.
    #[serde(rename = "documents")]
    PerDocument,
}

impl MentionPolicy {
    /// Config/CLI spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerMention => "mentions",
            Self::PerDocument => "documents",
        }
    }
}

impl fmt::Display for MentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mentions" | "mention" | "per-mention" => Ok(Self::PerMention),
            "documents" | "document" | "per-document" => Ok(Self::PerDocument),
            other => Err(format!(
                "unknown weighting {other:?}; expected \"mentions\" or \"documents\""
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Edge building
// ---------------------------------------------------------------------------

/// Build the co-occurrence edge multiset for one document.
///
/// `entities` must already be normalized. Pairs of equal names are skipped;
/// for `k` distinct names the result holds exactly `k(k-1)/2` edges.
#[must_use]
pub fn build_edges<S: AsRef<str>>(entities: &[S], policy: MentionPolicy) -> Vec<Edge> {
    let names: Vec<&str> = match policy {
        MentionPolicy::PerMention => entities.iter().map(AsRef::as_ref).collect(),
        MentionPolicy::PerDocument => dedup_preserving_order(entities),
    };

    let mut edges = Vec::with_capacity(names.len() * names.len().saturating_sub(1) / 2);
    for (i, x) in names.iter().enumerate() {
        for y in &names[i + 1..] {
            if let Some(edge) = Edge::new(*x, *y) {
                edges.push(edge);
            }
        }
    }
    edges
}

/// Keep the first occurrence of each name.
fn dedup_preserving_order<S: AsRef<str>>(entities: &[S]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::with_capacity(entities.len());
    entities
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| seen.insert(*name))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(x: &str, y: &str) -> Edge {
        Edge::new(x, y).expect("distinct endpoints")
    }

    #[test]
    fn orientation_is_lexicographic() {
        let e = edge("Trump", "Obama");
        assert_eq!(e.endpoints(), ("Obama", "Trump"));
        assert_eq!(e, edge("Obama", "Trump"));
    }

    #[test]
    fn self_loop_is_rejected() {
        assert!(Edge::new("Obama", "Obama").is_none());
        assert!(canonical_pair("Obama", "Obama").is_none());
    }

    #[test]
    fn canonical_pair_is_symmetric() {
        assert_eq!(canonical_pair("b", "a"), Some(("a", "b")));
        assert_eq!(canonical_pair("a", "b"), Some(("a", "b")));
    }

    #[test]
    fn distinct_entities_yield_choose_two_edges() {
        let names = ["A", "B", "C", "D"];
        let edges = build_edges(&names, MentionPolicy::PerMention);
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|e| e.a() != e.b()));
    }

    #[test]
    fn repeated_mentions_multiply_per_mention() {
        // Two mentions of A, one of B: two (A, B) instances.
        let edges = build_edges(&["A", "B", "A"], MentionPolicy::PerMention);
        assert_eq!(edges, vec![edge("A", "B"), edge("A", "B")]);
    }

    #[test]
    fn repeated_mentions_are_n_times_m() {
        let edges = build_edges(&["A", "A", "B", "B", "B"], MentionPolicy::PerMention);
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|e| *e == edge("A", "B")));
    }

    #[test]
    fn per_document_policy_caps_at_one() {
        let edges = build_edges(&["A", "A", "B", "B", "B"], MentionPolicy::PerDocument);
        assert_eq!(edges, vec![edge("A", "B")]);
    }

    #[test]
    fn single_or_no_entity_yields_nothing() {
        assert!(build_edges::<&str>(&[], MentionPolicy::PerMention).is_empty());
        assert!(build_edges(&["A"], MentionPolicy::PerMention).is_empty());
        assert!(build_edges(&["A", "A"], MentionPolicy::PerMention).is_empty());
    }

    #[test]
    fn policy_parses_from_config_spelling() {
        assert_eq!("mentions".parse::<MentionPolicy>(), Ok(MentionPolicy::PerMention));
        assert_eq!("Documents".parse::<MentionPolicy>(), Ok(MentionPolicy::PerDocument));
        assert!("bogus".parse::<MentionPolicy>().is_err());
        assert_eq!(MentionPolicy::default(), MentionPolicy::PerMention);
    }

    #[test]
    fn display_uses_both_endpoints() {
        assert_eq!(edge("B", "A").to_string(), "A -- B");
    }
}
