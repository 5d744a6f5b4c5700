#![forbid(unsafe_code)]
//! cooc-graph library.
//!
//! Builds the undirected weighted co-occurrence graph from an edge table and
//! computes degree, betweenness and eigenvector centrality over it.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums (`EigenvectorError`, `CentralityError`)
//!   mapped to `cooc_core::error::ErrorCode`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod graph;
pub mod metrics;
pub mod rank;
