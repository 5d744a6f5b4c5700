//! `cooc edges`: corpus → weighted edge table.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use cooc_core::config::CoocConfig;
use cooc_core::corpus::{CorpusFormat, DocumentBody, Subset, load_corpus};
use cooc_core::edges::MentionPolicy;
use cooc_core::pipeline::{CorpusSummary, PipelineOptions, build_edge_table};
use cooc_core::table::save_edge_table;
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `cooc edges`.
#[derive(Args, Debug)]
pub struct EdgesArgs {
    /// Corpus file (`.csv` with `text`/`label` columns, or `.jsonl`).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Corpus format; inferred from the file extension when omitted.
    #[arg(long, value_name = "csv|jsonl")]
    pub input_format: Option<CorpusFormat>,

    /// Documents to keep: `ALL` or a label such as `FAKE`.
    #[arg(long, default_value = "ALL")]
    pub subset: Subset,

    /// Edge weighting; overrides `[edges] weighting` from the config.
    #[arg(long, value_name = "mentions|documents")]
    pub weighting: Option<MentionPolicy>,

    /// Directory receiving `edgelist_<subset>.csv`.
    #[arg(long, default_value = "out/0_edgelists")]
    pub output_dir: PathBuf,

    /// Exact output file; takes precedence over `--output-dir`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Report payload for `cooc edges`.
#[derive(Debug, Serialize)]
pub struct EdgesReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub subset: String,
    pub weighting: MentionPolicy,
    pub kind: String,
    #[serde(flatten)]
    pub summary: CorpusSummary,
}

/// `<dir>/edgelist_<subset>.csv`
pub fn edgelist_path(dir: &Path, subset: &Subset) -> PathBuf {
    dir.join(format!("edgelist_{}.csv", subset.tag()))
}

/// Execute `cooc edges`.
pub fn run_edges(args: &EdgesArgs, config: &CoocConfig, output: OutputMode) -> Result<()> {
    let normalizer = config.normalizer().context("invalid alias table")?;
    let extractor = config.gazetteer();

    let documents = load_corpus(&args.input, args.input_format)
        .with_context(|| format!("failed to load corpus {}", args.input.display()))?;

    let has_raw_text = documents
        .iter()
        .any(|d| matches!(d.body, DocumentBody::Text(_)));
    if extractor.is_empty() && has_raw_text {
        warn!("no entity names configured; raw-text documents yield no mentions");
    }

    let options = PipelineOptions {
        subset: args.subset.clone(),
        kind: config.entities.kind.clone(),
        policy: args.weighting.unwrap_or(config.edges.weighting),
    };
    let (table, summary) = build_edge_table(&documents, &extractor, &normalizer, &options);

    let path = match &args.output {
        Some(path) => path.clone(),
        None => edgelist_path(&args.output_dir, &args.subset),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    save_edge_table(&table, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), edges = table.len(), "wrote edge table");

    let report = EdgesReport {
        input: args.input.clone(),
        output: path,
        subset: options.subset.tag().to_string(),
        weighting: options.policy,
        kind: options.kind,
        summary,
    };
    render(output, &report, render_edges_human)
}

fn render_edges_human(
    report: &EdgesReport,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let s = &report.summary;
    if !mode.is_pretty() {
        writeln!(w, "output={}", report.output.display())?;
        writeln!(w, "subset={}", report.subset)?;
        writeln!(w, "weighting={}", report.weighting)?;
        writeln!(w, "documents={}", s.documents)?;
        writeln!(w, "selected={}", s.selected)?;
        writeln!(w, "with_entities={}", s.with_entities)?;
        writeln!(w, "mentions={}", s.mentions)?;
        writeln!(w, "edge_instances={}", s.edge_instances)?;
        return writeln!(w, "distinct_edges={}", s.distinct_edges);
    }

    pretty_section(w, &format!("Edge table ({})", report.subset))?;
    pretty_kv(w, "Input", report.input.display().to_string())?;
    pretty_kv(w, "Output", report.output.display().to_string())?;
    pretty_kv(w, "Entity type", &report.kind)?;
    pretty_kv(w, "Weighting", report.weighting.as_str())?;
    writeln!(w)?;
    pretty_kv(w, "Documents", format!("{} ({} selected)", s.documents, s.selected))?;
    pretty_kv(w, "With entities", s.with_entities.to_string())?;
    pretty_kv(w, "Mentions", s.mentions.to_string())?;
    pretty_kv(w, "Co-occurrences", s.edge_instances.to_string())?;
    pretty_kv(w, "Edges", s.distinct_edges.to_string())
}
