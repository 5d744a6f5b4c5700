//! Graphviz DOT export.
//!
//! Nodes are labeled with entity names and edges with their weights. Layout
//! is left to Graphviz (`neato -Tsvg` reads the output directly).

use std::fs;
use std::io;
use std::path::Path;

use petgraph::dot::Dot;
use tracing::instrument;

use crate::graph::build::CooccurrenceGraph;

/// Render `graph` as an undirected DOT document.
#[must_use]
pub fn to_dot(graph: &CooccurrenceGraph) -> String {
    format!("{}", Dot::new(graph.inner()))
}

/// Write the DOT rendering of `graph` to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn write_dot(graph: &CooccurrenceGraph, path: &Path) -> io::Result<()> {
    fs::write(path, to_dot(graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cooc_core::aggregate::EdgeTable;
    use cooc_core::edges::Edge;

    #[test]
    fn dot_lists_names_and_weights() {
        let table: EdgeTable = [(Edge::new("Obama", "Trump").expect("distinct"), 3)]
            .into_iter()
            .collect();
        let dot = to_dot(&CooccurrenceGraph::from_table(&table, 0));
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("label = \"Obama\""));
        assert!(dot.contains("label = \"Trump\""));
        assert!(dot.contains("0 -- 1"));
        assert!(dot.contains("label = \"3\""));
    }

    #[test]
    fn empty_graph_is_valid_dot() {
        let dot = to_dot(&CooccurrenceGraph::from_table(&EdgeTable::new(), 0));
        assert!(dot.starts_with("graph {"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn write_dot_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("network.dot");
        let table: EdgeTable = [Edge::new("A", "B").expect("distinct")].into_iter().collect();
        write_dot(&CooccurrenceGraph::from_table(&table, 0), &path).expect("write");
        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("--"));
    }
}
