//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! Eigenvector centrality scores an entity by the scores of the entities it
//! co-occurs with: the dominant eigenvector of the adjacency matrix `A`.
//!
//! # Algorithm
//!
//! Power iteration on `A + I`:
//!
//! 1. Initialize scores uniformly to `1/sqrt(n)`.
//! 2. For each node `v`: `next(v) = score(v) + sum of w(u, v) * score(u)`
//!    over its neighbors `u`, with `w = 1` unless weighted.
//! 3. Normalize the score vector to unit L2 norm.
//! 4. Stop once no node moved by `tolerance` or more.
//!
//! Plain iteration on `A` oscillates forever on bipartite graphs (stars,
//! paths, even cycles) because `-λ` is an eigenvalue there too. The identity
//! shift moves every eigenvalue up by one, which breaks the tie without
//! changing the eigenvectors.
//!
//! # Errors
//!
//! An empty graph has no eigenvector ([`EigenvectorError::EmptyGraph`]). A
//! vector that has not converged within the iteration budget is never
//! returned ([`EigenvectorError::NotConverged`]).

use std::collections::HashMap;

use cooc_core::error::{Coded, ErrorCode};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument, warn};

use crate::graph::CooccurrenceGraph;

/// Power-iteration options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenvectorConfig {
    pub max_iterations: usize,
    /// Convergence threshold on the largest per-node change.
    pub tolerance: f64,
    /// Use co-occurrence counts as adjacency entries instead of 1.
    pub weighted: bool,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            weighted: false,
        }
    }
}

/// Why no eigenvector was produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EigenvectorError {
    #[error("eigenvector centrality is undefined on an empty graph")]
    EmptyGraph,

    #[error(
        "eigenvector centrality did not converge after {iterations} iterations \
         (last change {max_delta:.3e})"
    )]
    NotConverged { iterations: usize, max_delta: f64 },
}

impl Coded for EigenvectorError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyGraph => ErrorCode::EmptyGraph,
            Self::NotConverged { .. } => ErrorCode::EigenvectorNotConverged,
        }
    }
}

/// Result of a converged eigenvector computation.
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    /// Entity name → score; the vector has unit L2 norm.
    pub scores: HashMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
}

/// Compute eigenvector centrality for every node of `graph`.
///
/// # Errors
///
/// Returns [`EigenvectorError::EmptyGraph`] for a graph without nodes and
/// [`EigenvectorError::NotConverged`] if `max_iterations` is exhausted.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(
    graph: &CooccurrenceGraph,
    config: &EigenvectorConfig,
) -> Result<EigenvectorResult, EigenvectorError> {
    let g = graph.inner();
    let n = g.node_count();

    if n == 0 {
        return Err(EigenvectorError::EmptyGraph);
    }

    // Adjacency lists with the entry used for each neighbor.
    let adjacency: Vec<Vec<(usize, f64)>> = g
        .node_indices()
        .map(|v| {
            g.edges(v)
                .map(|edge| {
                    let other = if edge.source() == v {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    let entry = if config.weighted {
                        *edge.weight() as f64
                    } else {
                        1.0
                    };
                    (other.index(), entry)
                })
                .collect()
        })
        .collect();

    let mut scores: Vec<f64> = vec![1.0 / (n as f64).sqrt(); n];
    let mut max_delta = f64::INFINITY;

    for iter in 0..config.max_iterations {
        let mut next = scores.clone();
        for (vi, neighbors) in adjacency.iter().enumerate() {
            for &(ui, entry) in neighbors {
                next[vi] += entry * scores[ui];
            }
        }

        let norm: f64 = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut next {
                *x /= norm;
            }
        }

        max_delta = scores
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);

        scores = next;

        if max_delta < config.tolerance {
            let iterations = iter + 1;
            debug!(iterations, "eigenvector converged");
            let scores = g
                .node_indices()
                .filter_map(|idx| {
                    g.node_weight(idx)
                        .map(|name| (name.clone(), scores[idx.index()]))
                })
                .collect();
            return Ok(EigenvectorResult { scores, iterations });
        }
    }

    warn!(
        iterations = config.max_iterations,
        max_delta, "eigenvector did not converge"
    );
    Err(EigenvectorError::NotConverged {
        iterations: config.max_iterations,
        max_delta,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cooc_core::aggregate::EdgeTable;
    use cooc_core::edges::Edge;

    fn graph(edges: &[(&str, &str, u64)]) -> CooccurrenceGraph {
        let table: EdgeTable = edges
            .iter()
            .map(|(a, b, w)| (Edge::new(*a, *b).expect("distinct"), *w))
            .collect();
        CooccurrenceGraph::from_table(&table, 0)
    }

    #[test]
    fn triangle_is_uniform_and_immediate() {
        let result = eigenvector_centrality(
            &graph(&[("A", "B", 1), ("B", "C", 1), ("A", "C", 1)]),
            &EigenvectorConfig::default(),
        )
        .expect("converges");
        let expected = 1.0 / 3.0_f64.sqrt();
        for score in result.scores.values() {
            assert!((score - expected).abs() < 1e-9);
        }
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn star_converges_with_hub_on_top() {
        let result = eigenvector_centrality(
            &graph(&[("H", "A", 1), ("H", "B", 1), ("H", "C", 1), ("H", "D", 1)]),
            &EigenvectorConfig::default(),
        )
        .expect("star converges");
        // Dominant eigenvector of a 4-leaf star: hub 1/sqrt(2), leaves 1/(2*sqrt(2)).
        assert!((result.scores["H"] - 0.5_f64.sqrt()).abs() < 1e-5);
        assert!((result.scores["A"] - 0.125_f64.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn scores_have_unit_norm() {
        let result = eigenvector_centrality(
            &graph(&[("A", "B", 1), ("B", "C", 1), ("C", "D", 1), ("B", "D", 1)]),
            &EigenvectorConfig::default(),
        )
        .expect("converges");
        let norm: f64 = result.scores.values().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weights_change_scores_only_when_enabled() {
        let g = graph(&[("A", "B", 4), ("B", "C", 1)]);
        let unweighted =
            eigenvector_centrality(&g, &EigenvectorConfig::default()).expect("converges");
        assert!((unweighted.scores["A"] - unweighted.scores["C"]).abs() < 1e-5);

        let weighted = eigenvector_centrality(
            &g,
            &EigenvectorConfig {
                weighted: true,
                ..EigenvectorConfig::default()
            },
        )
        .expect("converges");
        assert!(weighted.scores["A"] > weighted.scores["C"]);
    }

    #[test]
    fn empty_graph_is_an_error() {
        let err = eigenvector_centrality(&graph(&[]), &EigenvectorConfig::default())
            .expect_err("empty");
        assert_eq!(err, EigenvectorError::EmptyGraph);
        assert_eq!(err.error_code(), ErrorCode::EmptyGraph);
    }

    #[test]
    fn tiny_budget_reports_not_converged() {
        let err = eigenvector_centrality(
            &graph(&[("A", "B", 1), ("B", "C", 1), ("C", "D", 1)]),
            &EigenvectorConfig {
                max_iterations: 1,
                tolerance: 1e-12,
                weighted: false,
            },
        )
        .expect_err("one step is not enough");
        match err {
            EigenvectorError::NotConverged {
                iterations,
                max_delta,
            } => {
                assert_eq!(iterations, 1);
                assert!(max_delta > 1e-12);
            }
            EigenvectorError::EmptyGraph => panic!("wrong error"),
        }
        assert_eq!(
            EigenvectorError::NotConverged {
                iterations: 1,
                max_delta: 0.1
            }
            .error_code(),
            ErrorCode::EigenvectorNotConverged
        );
    }
}
