//! Corpus-wide edge frequency table.
//!
//! # Overview
//!
//! [`EdgeTable`] maps each canonical [`Edge`] to the number of co-occurrence
//! events observed for it across the corpus. Accumulation is a plain sum, so
//! the table is independent of document order and [`EdgeTable::merge`] is
//! associative and commutative. That is what lets [`aggregate_par`] build
//! partial tables on rayon workers and combine them once at the end.
//!
//! The table is backed by a `BTreeMap`, so iteration (and therefore the
//! persisted CSV) follows `Edge` order and is reproducible.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::edges::Edge;

/// Weighted edge table: canonical edge → co-occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeTable {
    weights: BTreeMap<Edge, u64>,
}

impl EdgeTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `edge`.
    pub fn add(&mut self, edge: Edge, count: u64) {
        let slot = self.weights.entry(edge).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Add one occurrence per edge in `edges`.
    pub fn extend_edges<I: IntoIterator<Item = Edge>>(&mut self, edges: I) {
        for edge in edges {
            self.add(edge, 1);
        }
    }

    /// Combine two partial tables by summing weights.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        // Fold the smaller table into the larger one.
        let (mut big, small) = if self.weights.len() >= other.weights.len() {
            (std::mem::take(&mut self), other)
        } else {
            (other, std::mem::take(&mut self))
        };
        for (edge, count) in small.weights {
            big.add(edge, count);
        }
        big
    }

    /// Weight of `edge`, if present.
    #[must_use]
    pub fn get(&self, edge: &Edge) -> Option<u64> {
        self.weights.get(edge).copied()
    }

    /// Weight between `x` and `y` in either orientation; 0 when absent.
    #[must_use]
    pub fn weight(&self, x: &str, y: &str) -> u64 {
        Edge::new(x, y).and_then(|e| self.get(&e)).unwrap_or(0)
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// `true` if no edge has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Edges and weights in `Edge` order.
    pub fn iter(&self) -> impl Iterator<Item = (&Edge, u64)> {
        self.weights.iter().map(|(e, w)| (e, *w))
    }

    /// Sum of all weights (total co-occurrence events).
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.weights.values().fold(0_u64, |acc, w| acc.saturating_add(*w))
    }

    /// Every entity that appears in at least one edge.
    #[must_use]
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.weights
            .keys()
            .flat_map(|e| [e.a(), e.b()])
            .collect()
    }

    /// A new table holding only edges with `weight > min_weight`.
    #[must_use]
    pub fn filtered(&self, min_weight: u64) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .filter(|(_, w)| **w > min_weight)
                .map(|(e, w)| (e.clone(), *w))
                .collect(),
        }
    }
}

impl FromIterator<Edge> for EdgeTable {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend_edges(iter);
        table
    }
}

impl FromIterator<(Edge, u64)> for EdgeTable {
    fn from_iter<I: IntoIterator<Item = (Edge, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (edge, count) in iter {
            table.add(edge, count);
        }
        table
    }
}

impl<'a> IntoIterator for &'a EdgeTable {
    type Item = (&'a Edge, &'a u64);
    type IntoIter = std::collections::btree_map::Iter<'a, Edge, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.iter()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Sum per-document edge multisets into one table.
pub fn aggregate<I, D>(per_document_edges: I) -> EdgeTable
where
    I: IntoIterator<Item = D>,
    D: IntoIterator<Item = Edge>,
{
    let mut table = EdgeTable::new();
    for doc in per_document_edges {
        table.extend_edges(doc);
    }
    table
}

/// Build edges for every document on the rayon pool and aggregate them.
///
/// Each worker folds its documents into a private partial table; the
/// partials are combined with [`EdgeTable::merge`] once the workers are done.
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn aggregate_par<T, F>(documents: &[T], edges_for: F) -> EdgeTable
where
    T: Sync,
    F: Fn(&T) -> Vec<Edge> + Sync + Send,
{
    aggregate_par_with(documents, |doc, _: &mut ()| edges_for(doc), |(), ()| ()).0
}

/// [`aggregate_par`] with a per-worker side accumulator.
///
/// `edges_for` may record anything about a document in the worker's `S`;
/// the partial accumulators are combined with `merge_stats` alongside the
/// partial tables. `merge_stats` must be associative and commutative for the
/// result to be independent of how rayon splits the work.
pub fn aggregate_par_with<T, S, F, M>(
    documents: &[T],
    edges_for: F,
    merge_stats: M,
) -> (EdgeTable, S)
where
    T: Sync,
    S: Default + Send,
    F: Fn(&T, &mut S) -> Vec<Edge> + Sync + Send,
    M: Fn(S, S) -> S + Sync + Send,
{
    let (table, stats) = documents
        .par_iter()
        .fold(
            || (EdgeTable::new(), S::default()),
            |(mut partial, mut stats), doc| {
                partial.extend_edges(edges_for(doc, &mut stats));
                (partial, stats)
            },
        )
        .reduce(
            || (EdgeTable::new(), S::default()),
            |(ta, sa), (tb, sb)| (ta.merge(tb), merge_stats(sa, sb)),
        );
    debug!(edges = table.len(), total = table.total_weight(), "aggregated edge table");
    (table, stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
