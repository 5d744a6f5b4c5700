//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often an entity lies on shortest
//! paths between two other entities. High-betweenness entities are brokers:
//! removing them would separate groups that otherwise reach each other.
//!
//! # Algorithm
//!
//! Brandes (2001) with unit edge lengths. Co-occurrence weights only decide
//! which edges exist; they are not distances.
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! In an undirected graph every pair `(s, t)` is visited from both ends, so
//! the sum is halved. Pairs in different components contribute nothing.
//!
//! Complexity: O(V * E).
//!
//! # Output
//!
//! With [`BetweennessConfig::normalized`] (the default) scores are divided by
//! `(n-1)(n-2)/2`, the number of pairs not involving the node, and lie in
//! `[0, 1]`. Without it the raw pair sum is returned.

use std::collections::{HashMap, VecDeque};

use petgraph::graph::NodeIndex;
use tracing::instrument;

use crate::graph::CooccurrenceGraph;

/// Betweenness options.
///
/// Scores are normalized into `[0, 1]` by default, which is not the plain
/// unordered-pair sum. Set `normalized: false` to get that sum; the two
/// differ by the constant factor `(n-1)(n-2)/2`, so rankings agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetweennessConfig {
    /// Divide by `(n-1)(n-2)/2`.
    pub normalized: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self { normalized: true }
    }
}

/// Compute betweenness centrality for every node of `graph`.
///
/// Nodes that lie on no shortest path between other nodes score 0.0.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(
    graph: &CooccurrenceGraph,
    config: &BetweennessConfig,
) -> HashMap<String, f64> {
    let g = graph.inner();
    let n = g.node_count();

    if n == 0 {
        return HashMap::new();
    }

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_indices() {
        let si = s.index();

        // Nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);

        // predecessors[w]: nodes immediately before w on shortest s-w paths.
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(v);

            for w in g.neighbors(v) {
                let wi = w.index();

                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = w.index();

            for &v in &predecessors[wi] {
                let vi = v.index();
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    // Each unordered pair was counted from both endpoints.
    let mut scale = 0.5;
    if config.normalized {
        scale = if n > 2 {
            scale / (((n - 1) * (n - 2)) as f64 / 2.0)
        } else {
            0.0
        };
    }

    g.node_indices()
        .filter_map(|idx| {
            g.node_weight(idx)
                .map(|name| (name.clone(), cb[idx.index()] * scale))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cooc_core::aggregate::EdgeTable;
    use cooc_core::edges::Edge;

    fn graph(edges: &[(&str, &str)]) -> CooccurrenceGraph {
        let table: EdgeTable = edges
            .iter()
            .map(|(a, b)| Edge::new(*a, *b).expect("distinct"))
            .collect();
        CooccurrenceGraph::from_table(&table, 0)
    }

    fn raw() -> BetweennessConfig {
        BetweennessConfig { normalized: false }
    }

    #[test]
    fn path_middle_carries_all_traffic() {
        // A - B - C: B is on the single A-C path.
        let g = graph(&[("A", "B"), ("B", "C")]);
        let bc = betweenness_centrality(&g, &raw());
        assert!((bc["B"] - 1.0).abs() < 1e-12);
        assert!(bc["A"].abs() < 1e-12);
        assert!(bc["C"].abs() < 1e-12);

        let normalized = betweenness_centrality(&g, &BetweennessConfig::default());
        assert!((normalized["B"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn longer_path_counts_pairs() {
        // A - B - C - D: B lies on A-C and A-D, C on A-D and B-D.
        let bc = betweenness_centrality(&graph(&[("A", "B"), ("B", "C"), ("C", "D")]), &raw());
        assert!((bc["B"] - 2.0).abs() < 1e-12);
        assert!((bc["C"] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn default_divides_raw_sum_by_pair_count() {
        // 4 nodes: (n-1)(n-2)/2 = 3 pairs exclude any given node.
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "D")]);
        assert!(BetweennessConfig::default().normalized);
        let raw_scores = betweenness_centrality(&g, &raw());
        let normalized = betweenness_centrality(&g, &BetweennessConfig::default());
        for node in ["A", "B", "C", "D"] {
            assert!((normalized[node] - raw_scores[node] / 3.0).abs() < 1e-12);
        }
        assert!((normalized["B"] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn split_paths_share_credit() {
        // Square A-B-D-C-A: two shortest A-D paths, via B and via C.
        let bc = betweenness_centrality(
            &graph(&[("A", "B"), ("B", "D"), ("A", "C"), ("C", "D")]),
            &raw(),
        );
        for node in ["A", "B", "C", "D"] {
            assert!((bc[node] - 0.5).abs() < 1e-12, "{node}: {}", bc[node]);
        }
    }

    #[test]
    fn two_node_graph_is_zero_even_normalized() {
        let bc = betweenness_centrality(&graph(&[("A", "B")]), &BetweennessConfig::default());
        assert!(bc.values().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn empty_graph_has_no_scores() {
        assert!(betweenness_centrality(&graph(&[]), &BetweennessConfig::default()).is_empty());
    }
}
