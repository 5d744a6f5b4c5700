//! `cooc network`: edge table → graph → ranked centrality measures.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use cooc_core::config::CoocConfig;
use cooc_core::table::load_edge_table;
use cooc_graph::graph::{CooccurrenceGraph, GraphStats, write_dot};
use cooc_graph::rank::{CentralityConfig, CentralityRow, centrality_table};
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render};

/// Arguments for `cooc network`.
#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// Weighted edge table written by `cooc edges`.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Keep edges with weight strictly greater than this; overrides
    /// `[graph] min_weight` from the config.
    #[arg(long)]
    pub min_weight: Option<u64>,

    /// Directory receiving `centrality_measures_<name>.csv`.
    #[arg(long, default_value = "out/1_network")]
    pub output_dir: PathBuf,

    /// Also write the filtered graph as Graphviz DOT.
    #[arg(long)]
    pub dot: bool,

    /// Number of ranked entities to print.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Report payload for `cooc network`.
#[derive(Debug, Serialize)]
pub struct NetworkReport {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot: Option<PathBuf>,
    pub stats: GraphStats,
    pub top: Vec<CentralityRow>,
}

/// Name shared by the outputs of one edge table: the file stem without the
/// `edgelist_` prefix, so `edgelist_FAKE.csv` becomes `FAKE`.
pub fn network_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(rest) = stem.strip_prefix("edgelist_").filter(|r| !r.is_empty()) {
        return rest.to_string();
    }
    stem
}

/// Execute `cooc network`.
pub fn run_network(args: &NetworkArgs, config: &CoocConfig, output: OutputMode) -> Result<()> {
    let table = load_edge_table(&args.input)
        .with_context(|| format!("failed to load edge table {}", args.input.display()))?;

    let min_weight = args.min_weight.unwrap_or(config.graph.min_weight);
    let graph = CooccurrenceGraph::from_table(&table, min_weight);
    let stats = GraphStats::from_graph(&graph);

    let centrality = centrality_table(&graph, &CentralityConfig::from(&config.centrality))?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;
    let name = network_name(&args.input);

    let path = args.output_dir.join(format!("centrality_measures_{name}.csv"));
    centrality
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = centrality.len(), "wrote centrality table");

    let dot = if args.dot {
        let dot_path = args.output_dir.join(format!("network_{name}.dot"));
        write_dot(&graph, &dot_path)
            .with_context(|| format!("failed to write {}", dot_path.display()))?;
        Some(dot_path)
    } else {
        None
    };

    let report = NetworkReport {
        input: args.input.clone(),
        output: path,
        dot,
        stats,
        top: centrality.top(args.top).to_vec(),
    };
    render(output, &report, render_network_human)
}

fn render_network_human(
    report: &NetworkReport,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let s = &report.stats;
    if !mode.is_pretty() {
        writeln!(w, "output={}", report.output.display())?;
        if let Some(dot) = &report.dot {
            writeln!(w, "dot={}", dot.display())?;
        }
        writeln!(w, "nodes={}", s.node_count)?;
        writeln!(w, "edges={}", s.edge_count)?;
        writeln!(w, "density={:.6}", s.density)?;
        writeln!(w, "components={}", s.component_count)?;
        if s.node_count == 0 {
            return writeln!(w, "no_data=true");
        }
        for row in &report.top {
            writeln!(
                w,
                "{}\t{:.6}\t{:.6}\t{:.6}",
                row.node, row.degree, row.betweenness, row.eigenvector
            )?;
        }
        return Ok(());
    }

    pretty_section(w, &format!("Network (weight > {})", s.min_weight))?;
    pretty_kv(w, "Output", report.output.display().to_string())?;
    if let Some(dot) = &report.dot {
        pretty_kv(w, "DOT", dot.display().to_string())?;
    }

    if s.node_count == 0 {
        writeln!(w)?;
        return writeln!(
            w,
            "no data: no edge has weight above {}; try a lower --min-weight",
            s.min_weight
        );
    }

    pretty_kv(w, "Nodes", s.node_count.to_string())?;
    pretty_kv(w, "Edges", s.edge_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", s.density))?;
    pretty_kv(w, "Components", s.component_count.to_string())?;
    pretty_kv(
        w,
        "Degree",
        format!("max {} / mean {:.2}", s.max_degree, s.mean_degree),
    )?;
    pretty_kv(w, "Total weight", s.total_weight.to_string())?;

    writeln!(w)?;
    writeln!(
        w,
        "{:<4} {:<30} {:>10} {:>12} {:>12}",
        "#", "ENTITY", "DEGREE", "BETWEENNESS", "EIGENVECTOR"
    )?;
    pretty_rule(w)?;
    for (i, row) in report.top.iter().enumerate() {
        writeln!(
            w,
            "{:<4} {:<30} {:>10.4} {:>12.4} {:>12.4}",
            i + 1,
            row.node,
            row.degree,
            row.betweenness,
            row.eigenvector
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_name_strips_edgelist_prefix() {
        assert_eq!(network_name(Path::new("out/0_edgelists/edgelist_FAKE.csv")), "FAKE");
        assert_eq!(network_name(Path::new("pairs.csv")), "pairs");
        assert_eq!(network_name(Path::new("edgelist_.csv")), "edgelist_");
    }
}
