//! Centrality table: all three measures per entity, ranked.
//!
//! # Ranking
//!
//! Rows are ordered by descending degree, then descending betweenness, then
//! descending eigenvector score, compared with `f64::total_cmp`. Rows whose
//! three scores are all equal are listed by ascending entity name.
//!
//! # Output
//!
//! [`CentralityTable::write_csv`] writes `node,degree,betweenness,eigenvector`
//! with one row per entity in rank order. An empty table still gets the
//! header line.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use cooc_core::config::CentralitySettings;
use cooc_core::error::{Coded, ErrorCode};
use serde::Serialize;
use tracing::{info, instrument};

use crate::graph::CooccurrenceGraph;
use crate::metrics::betweenness::{BetweennessConfig, betweenness_centrality};
use crate::metrics::degree::degree_centrality;
use crate::metrics::eigenvector::{EigenvectorConfig, EigenvectorError, eigenvector_centrality};

/// Column names of the centrality CSV.
pub const HEADER: [&str; 4] = ["node", "degree", "betweenness", "eigenvector"];

/// Errors computing or writing a centrality table.
#[derive(Debug, thiserror::Error)]
pub enum CentralityError {
    #[error(transparent)]
    Eigenvector(#[from] EigenvectorError),

    #[error("failed to write centrality table: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write centrality table: {0}")]
    Csv(#[from] csv::Error),
}

impl Coded for CentralityError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Eigenvector(e) => e.error_code(),
            Self::Io(_) | Self::Csv(_) => ErrorCode::ReportWriteFailed,
        }
    }
}

/// Options for every measure in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CentralityConfig {
    pub betweenness: BetweennessConfig,
    pub eigenvector: EigenvectorConfig,
}

impl From<&CentralitySettings> for CentralityConfig {
    fn from(settings: &CentralitySettings) -> Self {
        Self {
            betweenness: BetweennessConfig {
                normalized: settings.normalized_betweenness,
            },
            eigenvector: EigenvectorConfig {
                max_iterations: settings.max_iterations,
                tolerance: settings.tolerance,
                weighted: settings.eigenvector_weighted,
            },
        }
    }
}

/// Scores for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityRow {
    pub node: String,
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
}

/// Ranking order: higher scores first, then name.
fn rank_order(x: &CentralityRow, y: &CentralityRow) -> Ordering {
    y.degree
        .total_cmp(&x.degree)
        .then_with(|| y.betweenness.total_cmp(&x.betweenness))
        .then_with(|| y.eigenvector.total_cmp(&x.eigenvector))
        .then_with(|| x.node.cmp(&y.node))
}

/// Sort `rows` into ranking order.
#[must_use]
pub fn rank(mut rows: Vec<CentralityRow>) -> Vec<CentralityRow> {
    rows.sort_by(rank_order);
    rows
}

/// Ranked centrality scores for every entity of a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CentralityTable {
    rows: Vec<CentralityRow>,
}

impl CentralityTable {
    /// Build a table from unranked rows.
    #[must_use]
    pub fn from_rows(rows: Vec<CentralityRow>) -> Self {
        Self { rows: rank(rows) }
    }

    /// Rows in rank order.
    #[must_use]
    pub fn rows(&self) -> &[CentralityRow] {
        &self.rows
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` for the "no data" result of an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `k` rows.
    #[must_use]
    pub fn top(&self, k: usize) -> &[CentralityRow] {
        &self.rows[..k.min(self.rows.len())]
    }

    /// Row for entity `node`.
    #[must_use]
    pub fn get(&self, node: &str) -> Option<&CentralityRow> {
        self.rows.iter().find(|row| row.node == node)
    }

    /// Write the table as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the writer fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), CentralityError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(HEADER)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the table as CSV to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    #[instrument(skip(self), fields(rows = self.len()))]
    pub fn save(&self, path: &Path) -> Result<(), CentralityError> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

/// Compute degree, betweenness and eigenvector centrality for `graph` and
/// rank the entities.
///
/// The three measures run concurrently on the rayon pool. An empty graph
/// yields an empty table.
///
/// # Errors
///
/// Returns [`CentralityError::Eigenvector`] if power iteration does not
/// converge.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn centrality_table(
    graph: &CooccurrenceGraph,
    config: &CentralityConfig,
) -> Result<CentralityTable, CentralityError> {
    if graph.is_empty() {
        info!("graph is empty, no centrality data");
        return Ok(CentralityTable::default());
    }

    let (degree, (betweenness, eigenvector)) = rayon::join(
        || degree_centrality(graph),
        || {
            rayon::join(
                || betweenness_centrality(graph, &config.betweenness),
                || eigenvector_centrality(graph, &config.eigenvector),
            )
        },
    );
    let eigenvector = eigenvector?;

    let rows = graph
        .nodes()
        .into_iter()
        .map(|node| CentralityRow {
            node: node.to_string(),
            degree: degree.get(node).copied().unwrap_or(0.0),
            betweenness: betweenness.get(node).copied().unwrap_or(0.0),
            eigenvector: eigenvector.scores.get(node).copied().unwrap_or(0.0),
        })
        .collect();

    let table = CentralityTable::from_rows(rows);
    info!(
        rows = table.len(),
        eigenvector_iterations = eigenvector.iterations,
        "computed centrality table"
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
