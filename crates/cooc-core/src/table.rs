//! Persisted weighted edge table (`nodeA,nodeB,weight` CSV).
//!
//! Columns are located by header name, so extra columns (a leading row
//! index, for instance) are ignored. Loading fails fast on a missing
//! column, a weight that is not a non-negative integer, an empty node name
//! or a self-loop. Rows are re-canonicalized on load and repeated rows for
//! the same edge are summed.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::aggregate::EdgeTable;
use crate::edges::Edge;
use crate::error::{Coded, ErrorCode};

pub const NODE_A: &str = "nodeA";
pub const NODE_B: &str = "nodeB";
pub const WEIGHT: &str = "weight";

/// Errors reading or writing an edge table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("edge table I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("edge table CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("edge table is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("line {line}: weight {value:?} is not a non-negative integer")]
    InvalidWeight { line: u64, value: String },

    #[error("line {line}: empty node name")]
    EmptyNode { line: u64 },

    #[error("line {line}: self-loop on {node:?}")]
    SelfLoop { line: u64, node: String },
}

impl Coded for TableError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::EdgeTableIo,
            Self::Csv(_)
            | Self::MissingColumn(_)
            | Self::InvalidWeight { .. }
            | Self::EmptyNode { .. }
            | Self::SelfLoop { .. } => ErrorCode::EdgeTableMalformed,
        }
    }
}

/// Parse an edge table from CSV with a header row.
///
/// # Errors
///
/// Returns a [`TableError`] describing the first malformed row.
pub fn read_edge_table<R: Read>(reader: R) -> Result<EdgeTable, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(TableError::MissingColumn(name))
    };
    let a_col = column(NODE_A)?;
    let b_col = column(NODE_B)?;
    let w_col = column(WEIGHT)?;

    let mut table = EdgeTable::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        let a = record.get(a_col).unwrap_or_default();
        let b = record.get(b_col).unwrap_or_default();
        let raw_weight = record.get(w_col).unwrap_or_default();

        if a.is_empty() || b.is_empty() {
            return Err(TableError::EmptyNode { line });
        }
        let weight: u64 = raw_weight.parse().map_err(|_| TableError::InvalidWeight {
            line,
            value: raw_weight.to_string(),
        })?;
        let edge = Edge::new(a, b).ok_or_else(|| TableError::SelfLoop {
            line,
            node: a.to_string(),
        })?;
        table.add(edge, weight);
    }

    debug!(edges = table.len(), "read edge table");
    Ok(table)
}

/// Write `table` as CSV with a `nodeA,nodeB,weight` header, in edge order.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_edge_table<W: Write>(table: &EdgeTable, writer: W) -> Result<(), TableError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([NODE_A, NODE_B, WEIGHT])?;
    for (edge, weight) in table.iter() {
        wtr.write_record([edge.a(), edge.b(), weight.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Load an edge table from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is malformed.
#[instrument]
pub fn load_edge_table(path: &Path) -> Result<EdgeTable, TableError> {
    let file = File::open(path)?;
    read_edge_table(io::BufReader::new(file))
}

/// Save `table` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[instrument(skip(table), fields(edges = table.len()))]
pub fn save_edge_table(table: &EdgeTable, path: &Path) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_edge_table(table, io::BufWriter::new(file))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
