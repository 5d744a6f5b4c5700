#![forbid(unsafe_code)]
//! cooc-core library.
//!
//! Everything between a corpus and a weighted co-occurrence edge table:
//! mention extraction, name normalization, per-document edge building,
//! corpus-wide aggregation and the `nodeA,nodeB,weight` CSV format.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per concern, each mapped to an
//!   [`error::ErrorCode`] through [`error::Coded`]; `anyhow::Result` for
//!   configuration loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod edges;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod table;
