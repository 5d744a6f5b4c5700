//! Co-occurrence graph module.
//!
//! # Overview
//!
//! This module turns a weighted [`EdgeTable`](cooc_core::aggregate::EdgeTable)
//! into a petgraph-based undirected graph, filtered by a minimum edge weight.
//! The graph feeds every centrality metric in [`crate::metrics`].
//!
//! ## Pipeline
//!
//! ```text
//! EdgeTable (all co-occurrence counts)
//!        ↓  build::CooccurrenceGraph::from_table(table, min_weight)
//! CooccurrenceGraph (UnGraph, edges with weight > min_weight)
//!        ├─ stats::GraphStats::from_graph()
//!        └─ export::to_dot()
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use cooc_core::table::load_edge_table;
//! use cooc_graph::graph::{CooccurrenceGraph, GraphStats};
//!
//! let table = load_edge_table(path)?;
//! let graph = CooccurrenceGraph::from_table(&table, 500);
//! let stats = GraphStats::from_graph(&graph);
//!
//! println!("nodes={} edges={} density={:.3}",
//!     stats.node_count, stats.edge_count, stats.density);
//! ```

pub mod build;
pub mod export;
pub mod stats;

pub use build::{CooccurrenceGraph, Neighbor};
pub use export::{to_dot, write_dot};
pub use stats::GraphStats;
