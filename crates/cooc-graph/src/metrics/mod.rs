//! Centrality metrics for the co-occurrence graph.
//!
//! # Overview
//!
//! Each metric answers a different question about an entity's importance in
//! the network:
//!
//! - **Degree centrality** (`degree`): With how many distinct entities does
//!   this one co-occur?
//! - **Betweenness centrality** (`betweenness`): Which entities bridge
//!   otherwise separate groups?
//! - **Eigenvector centrality** (`eigenvector`): Which entities co-occur with
//!   other central entities?
//!
//! # Usage
//!
//! All metrics take a [`CooccurrenceGraph`](crate::graph::CooccurrenceGraph)
//! reference and return scores keyed by entity name. They are independent
//! and read-only, so [`crate::rank::centrality_table`] runs them side by side.
//!
//! ```rust,ignore
//! use cooc_graph::metrics::betweenness::{BetweennessConfig, betweenness_centrality};
//! use cooc_graph::metrics::degree::degree_centrality;
//! use cooc_graph::metrics::eigenvector::{EigenvectorConfig, eigenvector_centrality};
//!
//! let dc = degree_centrality(&graph);
//! let bc = betweenness_centrality(&graph, &BetweennessConfig::default());
//! let ev = eigenvector_centrality(&graph, &EigenvectorConfig::default())?;
//! ```

pub mod betweenness;
pub mod degree;
pub mod eigenvector;
