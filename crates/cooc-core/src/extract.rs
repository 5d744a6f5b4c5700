//! Entity mentions and the extraction service interface.
//!
//! The statistical annotator that finds entity spans in raw text lives
//! outside this crate. [`EntityExtractor`] is the seam it plugs into: a
//! stateless, shareable service built once at startup and called once per
//! document, possibly from many rayon workers at the same time.
//!
//! [`Gazetteer`] is the in-tree implementation: a deterministic dictionary
//! matcher over a fixed list of names. It is what the CLI uses for raw-text
//! corpora, and what tests use when they need an extractor.

use serde::{Deserialize, Serialize};

/// Entity type processed by default.
pub const PERSON: &str = "PERSON";

/// A single entity mention found in one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mention {
    /// Mention text as it appears in the document.
    pub text: String,
    /// Entity type, e.g. `PERSON`.
    #[serde(rename = "label", alias = "kind")]
    pub kind: String,
}

impl Mention {
    #[must_use]
    pub fn new(text: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: kind.into(),
        }
    }

    /// Shorthand for a [`PERSON`] mention.
    #[must_use]
    pub fn person(text: impl Into<String>) -> Self {
        Self::new(text, PERSON)
    }
}

/// Text of the mentions whose type equals `kind`, in document order.
#[must_use]
pub fn mentions_of_kind<'a>(mentions: &'a [Mention], kind: &str) -> Vec<&'a str> {
    mentions
        .iter()
        .filter(|m| m.kind == kind)
        .map(|m| m.text.as_str())
        .collect()
}

/// Service that finds entity mentions in a document.
///
/// Implementations carry no per-call mutable state, so one instance can be
/// shared across worker threads.
pub trait EntityExtractor: Send + Sync {
    /// Mentions in `text`, in document order.
    fn extract(&self, text: &str) -> Vec<Mention>;
}

impl<F> EntityExtractor for F
where
    F: Fn(&str) -> Vec<Mention> + Send + Sync,
{
    fn extract(&self, text: &str) -> Vec<Mention> {
        self(text)
    }
}

// ---------------------------------------------------------------------------
// Gazetteer
// ---------------------------------------------------------------------------

/// Dictionary extractor matching a fixed list of names as whole words.
///
/// At every word start the longest matching name wins and matching resumes
/// after it, so `Hillary Clinton` is one mention, not `Hillary` plus
/// `Clinton`. Every match is tagged with the same entity type.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    /// Longest first; ties broken lexicographically.
    names: Vec<String>,
    kind: String,
}

impl Gazetteer {
    /// Build a gazetteer over `names`, tagging matches as `kind`.
    ///
    /// Empty and duplicate names are dropped.
    #[must_use]
    pub fn new<I, S>(names: I, kind: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n| !n.trim().is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();
        Self {
            names,
            kind: kind.into(),
        }
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` if the gazetteer can never match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entity type assigned to matches.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    fn longest_match_at(&self, rest: &str) -> Option<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .find(|name| rest.starts_with(name) && ends_word(&rest[name.len()..]))
    }
}

impl EntityExtractor for Gazetteer {
    fn extract(&self, text: &str) -> Vec<Mention> {
        let mut mentions = Vec::new();
        if self.names.is_empty() {
            return mentions;
        }

        let mut pos = 0;
        let mut prev: Option<char> = None;
        while pos < text.len() {
            let rest = &text[pos..];
            let at_word_start = prev.is_none_or(|c| !c.is_alphanumeric());
            if at_word_start {
                if let Some(name) = self.longest_match_at(rest) {
                    mentions.push(Mention::new(name, self.kind.clone()));
                    prev = name.chars().last();
                    pos += name.len();
                    continue;
                }
            }
            let Some(c) = rest.chars().next() else { break };
            prev = Some(c);
            pos += c.len_utf8();
        }
        mentions
    }
}

/// `true` if a match ending right before `tail` ends on a word boundary.
fn ends_word(tail: &str) -> bool {
    tail.chars().next().is_none_or(|c| !c.is_alphanumeric())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
