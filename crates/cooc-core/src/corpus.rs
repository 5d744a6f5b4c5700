//! Corpus readers and the subset selector.
//!
//! # Formats
//!
//! - **CSV** (`.csv`): one document per row, a `text` column and an
//!   optional `label` column (e.g. `FAKE` / `REAL`), an optional `id`
//!   column. Other columns are ignored. Documents carry raw text and go
//!   through an [`EntityExtractor`].
//! - **JSONL** (`.jsonl`, `.ndjson`): one JSON object per line, the output
//!   of an external annotator:
//!
//!   ```json
//!   {"id": 7, "label": "REAL", "entities": [{"text": "Obama", "label": "PERSON"}]}
//!   ```
//!
//!   A line with `text` and no `entities` is treated as raw text. Blank lines
//!   are skipped.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Coded, ErrorCode};
use crate::extract::{EntityExtractor, Mention};

/// Errors loading a corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corpus CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("corpus CSV has no `text` column")]
    MissingTextColumn,

    #[error("line {line}: invalid JSON document: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: document has neither `entities` nor `text`")]
    EmptyRecord { line: usize },

    #[error("cannot infer corpus format from {0}; expected .csv or .jsonl")]
    UnknownFormat(PathBuf),
}

impl Coded for CorpusError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownFormat(_) => ErrorCode::CorpusFormatUnknown,
            _ => ErrorCode::CorpusReadFailed,
        }
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// What a document carries: raw text or annotator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    Text(String),
    Annotated(Vec<Mention>),
}

/// One corpus document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub label: Option<String>,
    pub body: DocumentBody,
}

impl Document {
    /// A raw-text document.
    #[must_use]
    pub fn text(id: impl Into<String>, label: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.map(str::to_string),
            body: DocumentBody::Text(text.into()),
        }
    }

    /// A pre-annotated document.
    #[must_use]
    pub fn annotated(id: impl Into<String>, label: Option<&str>, mentions: Vec<Mention>) -> Self {
        Self {
            id: id.into(),
            label: label.map(str::to_string),
            body: DocumentBody::Annotated(mentions),
        }
    }

    /// Mentions of this document: the stored annotations, or whatever
    /// `extractor` finds in the text.
    #[must_use]
    pub fn mentions(&self, extractor: &dyn EntityExtractor) -> Cow<'_, [Mention]> {
        match &self.body {
            DocumentBody::Annotated(mentions) => Cow::Borrowed(mentions),
            DocumentBody::Text(text) => Cow::Owned(extractor.extract(text)),
        }
    }
}

// ---------------------------------------------------------------------------
// Subset selector
// ---------------------------------------------------------------------------

/// Which documents of the corpus to analyse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Subset {
    #[default]
    All,
    /// Only documents whose label equals this value exactly.
    Label(String),
}

impl Subset {
    /// `true` if `doc` belongs to the subset.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Label(label) => doc.label.as_deref() == Some(label.as_str()),
        }
    }

    /// Tag used in output file names, e.g. `edgelist_FAKE.csv`.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::All => "ALL",
            Self::Label(label) => label,
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Subset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("subset must not be empty".to_string());
        }
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Label(s.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// On-disk corpus layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Csv,
    Jsonl,
}

impl CorpusFormat {
    /// Infer the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

impl FromStr for CorpusFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            other => Err(format!("unknown corpus format {other:?}; expected csv or jsonl")),
        }
    }
}

impl fmt::Display for CorpusFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Jsonl => "jsonl",
        })
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read a CSV corpus with a `text` column and optional `label` / `id`.
///
/// # Errors
///
/// Returns an error on CSV syntax problems or a missing `text` column.
pub fn read_csv_corpus<R: Read>(reader: R) -> Result<Vec<Document>, CorpusError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let text_col = find("text").ok_or(CorpusError::MissingTextColumn)?;
    let label_col = find("label");
    let id_col = find("id");

    let mut docs = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let text = record.get(text_col).unwrap_or_default();
        let label = label_col
            .and_then(|c| record.get(c))
            .map(str::trim)
            .filter(|l| !l.is_empty());
        let id = id_col
            .and_then(|c| record.get(c))
            .map_or_else(|| (row + 1).to_string(), str::to_string);
        docs.push(Document::text(id, label, text));
    }
    Ok(docs)
}

#[derive(Debug, Deserialize)]
struct AnnotatedRecord {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    entities: Option<Vec<Mention>>,
    #[serde(default)]
    text: Option<String>,
}

/// Read a JSONL corpus of annotated (or raw-text) documents.
///
/// # Errors
///
/// Returns an error on an unreadable line, invalid JSON, or a record with
/// neither `entities` nor `text`.
pub fn read_jsonl_corpus<R: BufRead>(reader: R) -> Result<Vec<Document>, CorpusError> {
    let mut docs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| CorpusError::Io {
            path: PathBuf::from("<stream>"),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: AnnotatedRecord = serde_json::from_str(&line).map_err(|source| {
            CorpusError::Json {
                line: line_no,
                source,
            }
        })?;

        let id = match record.id {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => line_no.to_string(),
        };
        let label = record.label.as_deref();
        let doc = match (record.entities, record.text) {
            (Some(mentions), _) => Document::annotated(id, label, mentions),
            (None, Some(text)) => Document::text(id, label, text),
            (None, None) => return Err(CorpusError::EmptyRecord { line: line_no }),
        };
        docs.push(doc);
    }
    Ok(docs)
}

/// Load a corpus file, inferring the format from the extension unless
/// `format` is given.
///
/// # Errors
///
/// Returns an error if the format is unknown, the file cannot be opened, or
/// its content is malformed.
#[instrument(skip(format))]
pub fn load_corpus(path: &Path, format: Option<CorpusFormat>) -> Result<Vec<Document>, CorpusError> {
    let format = format
        .or_else(|| CorpusFormat::from_path(path))
        .ok_or_else(|| CorpusError::UnknownFormat(path.to_path_buf()))?;

    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let docs = match format {
        CorpusFormat::Csv => read_csv_corpus(reader)?,
        CorpusFormat::Jsonl => read_jsonl_corpus(reader)?,
    };
    debug!(documents = docs.len(), %format, "loaded corpus");
    Ok(docs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Gazetteer, PERSON};

    #[test]
    fn csv_corpus_reads_text_and_label() {
        let csv = ",title,text,label\n0,t1,\"Trump met Obama\",FAKE\n1,t2,Clinton spoke,REAL\n";
        let docs = read_csv_corpus(csv.as_bytes()).expect("valid csv");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "1");
        assert_eq!(docs[0].label.as_deref(), Some("FAKE"));
        assert_eq!(docs[0].body, DocumentBody::Text("Trump met Obama".to_string()));
    }

    #[test]
    fn csv_corpus_without_text_column_fails() {
        let err = read_csv_corpus("title,label\nx,FAKE\n".as_bytes()).expect_err("no text");
        assert!(matches!(err, CorpusError::MissingTextColumn));
    }

    #[test]
    fn csv_corpus_without_label_is_unlabeled() {
        let docs = read_csv_corpus("id,text\na,hello\n".as_bytes()).expect("valid");
        assert_eq!(docs[0].id, "a");
        assert_eq!(docs[0].label, None);
    }

    #[test]
    fn jsonl_corpus_reads_annotations() {
        let jsonl = r#"{"id": 7, "label": "REAL", "entities": [{"text": "Obama", "label": "PERSON"}, {"text": "Ohio", "label": "GPE"}]}

{"id": "b", "text": "Trump spoke"}
"#;
        let docs = read_jsonl_corpus(jsonl.as_bytes()).expect("valid jsonl");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "7");
        assert_eq!(
            docs[0].body,
            DocumentBody::Annotated(vec![
                Mention::person("Obama"),
                Mention::new("Ohio", "GPE")
            ])
        );
        assert_eq!(docs[1].id, "b");
        assert_eq!(docs[1].label, None);
    }

    #[test]
    fn jsonl_reports_bad_line() {
        let err = read_jsonl_corpus("{\"text\": \"ok\"}\nnot json\n".as_bytes()).expect_err("bad");
        assert!(matches!(err, CorpusError::Json { line: 2, .. }));
    }

    #[test]
    fn jsonl_record_needs_content() {
        let err = read_jsonl_corpus("{\"id\": 1}\n".as_bytes()).expect_err("empty");
        assert!(matches!(err, CorpusError::EmptyRecord { line: 1 }));
    }

    #[test]
    fn subset_selects_by_label() {
        let fake = Document::text("1", Some("FAKE"), "");
        let real = Document::text("2", Some("REAL"), "");
        let none = Document::text("3", None, "");
        let subset: Subset = "FAKE".parse().expect("valid");
        assert!(subset.matches(&fake));
        assert!(!subset.matches(&real));
        assert!(!subset.matches(&none));
        let all: Subset = "all".parse().expect("valid");
        assert_eq!(all, Subset::All);
        assert!(all.matches(&none));
        assert_eq!(all.tag(), "ALL");
        assert_eq!(subset.tag(), "FAKE");
    }

    #[test]
    fn document_mentions_uses_extractor_for_text() {
        let g = Gazetteer::new(["Obama"], PERSON);
        let doc = Document::text("1", None, "Obama and Obama");
        assert_eq!(doc.mentions(&g).len(), 2);
        let annotated = Document::annotated("2", None, vec![Mention::person("Trump")]);
        assert_eq!(annotated.mentions(&g).as_ref(), &[Mention::person("Trump")]);
    }

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(CorpusFormat::from_path(Path::new("a/news.csv")), Some(CorpusFormat::Csv));
        assert_eq!(CorpusFormat::from_path(Path::new("a.JSONL")), Some(CorpusFormat::Jsonl));
        assert_eq!(CorpusFormat::from_path(Path::new("a.txt")), None);
    }

    #[test]
    fn load_corpus_rejects_unknown_extension() {
        let err = load_corpus(Path::new("corpus.txt"), None).expect_err("unknown");
        assert_eq!(err.error_code(), ErrorCode::CorpusFormatUnknown);
    }

    #[test]
    fn load_corpus_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("news.csv");
        std::fs::write(&path, "text,label\nTrump and Obama,FAKE\n").expect("write");
        let docs = load_corpus(&path, None).expect("load");
        assert_eq!(docs.len(), 1);
    }
}
