//! Graph construction from a weighted edge table.
//!
//! # Overview
//!
//! [`CooccurrenceGraph::from_table`] keeps the edges of an [`EdgeTable`]
//! whose weight is strictly greater than `min_weight` and builds a
//! [`petgraph`] undirected graph from them. Nodes are derived from the
//! surviving edges only, so an entity whose every edge was filtered out is
//! not part of the graph.
//!
//! Nodes are inserted in ascending name order, so `NodeIndex` order and
//! [`CooccurrenceGraph::nodes`] agree and every traversal is reproducible.
//!
//! ## Cache Invalidation
//!
//! The graph carries a content hash of the retained edge set (BLAKE3 of the
//! sorted `(a, b, weight)` list). Two graphs with the same hash have the same
//! nodes, edges and weights.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use cooc_core::aggregate::EdgeTable;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// CooccurrenceGraph
// ---------------------------------------------------------------------------

/// A neighbor of a node and the weight of the edge leading to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub name: String,
    pub weight: u64,
}

/// An undirected weighted co-occurrence graph.
///
/// Nodes are canonical entity names, edge weights are co-occurrence counts.
/// There are no self-loops, no parallel edges and no isolated nodes.
/// Immutable once built: a different threshold means a new graph.
#[derive(Debug, Clone)]
pub struct CooccurrenceGraph {
    graph: UnGraph<String, u64>,
    node_map: HashMap<String, NodeIndex>,
    min_weight: u64,
    content_hash: String,
}

impl CooccurrenceGraph {
    /// Build the graph from the edges of `table` with `weight > min_weight`.
    #[must_use]
    #[instrument(skip(table), fields(table_edges = table.len()))]
    pub fn from_table(table: &EdgeTable, min_weight: u64) -> Self {
        let kept = table.filtered(min_weight);

        // BTreeSet: ascending name order.
        let names = kept.nodes();
        let mut graph = UnGraph::<String, u64>::with_capacity(names.len(), kept.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(names.len());
        for name in names {
            let idx = graph.add_node(name.to_string());
            node_map.insert(name.to_string(), idx);
        }

        let mut hasher = blake3::Hasher::new();
        for (edge, weight) in kept.iter() {
            let (a, b) = edge.endpoints();
            // Both endpoints were inserted above.
            if let (Some(&ia), Some(&ib)) = (node_map.get(a), node_map.get(b)) {
                graph.add_edge(ia, ib, weight);
            }
            hasher.update(a.as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.as_bytes());
            hasher.update(b"\x00");
            hasher.update(&weight.to_le_bytes());
        }
        let content_hash = format!("blake3:{}", hasher.finalize());

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped = table.len() - kept.len(),
            "built co-occurrence graph"
        );

        Self {
            graph,
            node_map,
            min_weight,
            content_hash,
        }
    }

    /// Number of entities in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of retained edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// `true` if no edge survived the threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Threshold the graph was built with.
    #[must_use]
    pub const fn min_weight(&self) -> u64 {
        self.min_weight
    }

    /// BLAKE3 hash of the retained edge set, prefixed with `blake3:`.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Underlying petgraph graph, for the metrics.
    #[must_use]
    pub const fn inner(&self) -> &UnGraph<String, u64> {
        &self.graph
    }

    /// Node names in ascending order (also `NodeIndex` order).
    #[must_use]
    pub fn nodes(&self) -> Vec<&str> {
        self.graph.node_weights().map(String::as_str).collect()
    }

    /// `true` if `name` is a node of the graph.
    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Look up the `NodeIndex` for an entity name.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Entity name of a node.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Neighbors of `name` with edge weights, sorted by neighbor name.
    ///
    /// Returns `None` if `name` is not a node.
    #[must_use]
    pub fn neighbors(&self, name: &str) -> Option<Vec<Neighbor>> {
        let idx = self.node_index(name)?;
        let mut out: Vec<Neighbor> = self
            .graph
            .edges(idx)
            .filter_map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                self.name(other).map(|n| Neighbor {
                    name: n.to_string(),
                    weight: *edge.weight(),
                })
            })
            .collect();
        out.sort_by(|x, y| x.name.cmp(&y.name));
        Some(out)
    }

    /// Number of neighbors of `name`, or `None` if it is not a node.
    #[must_use]
    pub fn degree(&self, name: &str) -> Option<usize> {
        self.node_index(name)
            .map(|idx| self.graph.neighbors(idx).count())
    }

    /// Weight of the edge between `a` and `b` in either orientation.
    #[must_use]
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u64> {
        let ia = self.node_index(a)?;
        let ib = self.node_index(b)?;
        let edge = self.graph.find_edge(ia, ib)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Sum of all retained edge weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.graph
            .edge_weights()
            .fold(0_u64, |acc, w| acc.saturating_add(*w))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
