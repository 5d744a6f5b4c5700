//! Degree centrality.
//!
//! `degree(v) / (n - 1)`: the fraction of the other entities that `v`
//! co-occurs with. Edge weights are ignored. A graph with one node or none
//! scores 0.0 everywhere.

use std::collections::HashMap;

use tracing::instrument;

use crate::graph::CooccurrenceGraph;

/// Degree centrality for every node, in `[0, 1]`.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(graph: &CooccurrenceGraph) -> HashMap<String, f64> {
    let g = graph.inner();
    let n = g.node_count();
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };

    g.node_indices()
        .filter_map(|idx| {
            let degree = g.neighbors(idx).count();
            g.node_weight(idx)
                .map(|name| (name.clone(), degree as f64 * scale))
        })
        .collect()
}

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

    #[test]
    fn star_hub_touches_everyone() {
        let dc = degree_centrality(&graph(&[("H", "A"), ("H", "B"), ("H", "C")]));
        assert!((dc["H"] - 1.0).abs() < 1e-12);
        assert!((dc["A"] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_edge_scores_one() {
        let dc = degree_centrality(&graph(&[("A", "B")]));
        assert!((dc["A"] - 1.0).abs() < 1e-12);
        assert!((dc["B"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_graph_has_no_scores() {
        assert!(degree_centrality(&graph(&[])).is_empty());
    }
}
