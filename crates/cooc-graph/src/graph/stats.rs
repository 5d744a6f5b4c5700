//! Summary statistics for the co-occurrence graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the filtered graph.
//! - **density**: ratio of actual edges to the maximum for an undirected
//!   simple graph: `density = 2 * edge_count / (node_count * (node_count - 1))`.
//!   Zero for graphs with 0 or 1 node.
//! - **component_count**: number of connected components. More than one
//!   means the entity network is split into groups that never co-occur.
//! - **max_degree** / **mean_degree**: neighbor counts.
//! - **total_weight**: sum of retained co-occurrence counts.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::build::CooccurrenceGraph;

/// Summary statistics for a [`CooccurrenceGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// `2E / (V(V-1))`, in `[0, 1]`.
    pub density: f64,
    pub component_count: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    pub total_weight: u64,
    /// Threshold the graph was built with.
    pub min_weight: u64,
    pub content_hash: String,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    pub fn from_graph(graph: &CooccurrenceGraph) -> Self {
        let g = graph.inner();
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let max_degree = g
            .node_indices()
            .map(|idx| g.neighbors(idx).count())
            .max()
            .unwrap_or(0);

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            component_count: if node_count == 0 {
                0
            } else {
                connected_components(g)
            },
            max_degree,
            mean_degree: compute_mean_degree(node_count, edge_count),
            total_weight: graph.total_weight(),
            min_weight: graph.min_weight(),
            content_hash: graph.content_hash().to_string(),
        }
    }

    /// `true` if every entity co-occurs, directly or not, with every other.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count == 1
    }
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    edge_count as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn compute_mean_degree(node_count: usize, edge_count: usize) -> f64 {
    if node_count == 0 {
        return 0.0_f64;
    }
    (2 * edge_count) as f64 / node_count as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
