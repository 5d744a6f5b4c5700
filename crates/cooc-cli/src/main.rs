#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cooc_core::config::{CoocConfig, resolve_config};
use output::{CliError, OutputMode, render_error};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cooc: entity co-occurrence networks and centrality",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty (human), text (script-friendly), or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file; defaults to ./cooc.toml, then the user config dir.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Pipeline",
        about = "Build the weighted edge table of a corpus",
        long_about = "Extract entity mentions from every selected document, normalize \
                      aliases, count co-occurring pairs and write the edge table as CSV.",
        after_help = "EXAMPLES:\n    \
                      # All documents, default output dir\n    \
                      cooc edges --input news.csv\n\n    \
                      # Only fake-news documents, one count per document\n    \
                      cooc edges --input news.csv --subset FAKE --weighting documents\n\n    \
                      # Pre-annotated corpus, JSON summary\n    \
                      cooc edges --input annotated.jsonl --format json"
    )]
    Edges(cmd::edges::EdgesArgs),

    #[command(
        next_help_heading = "Pipeline",
        about = "Rank entities by degree, betweenness and eigenvector centrality",
        long_about = "Load an edge table, keep edges heavier than the threshold, build the \
                      co-occurrence graph and write the ranked centrality measures as CSV.",
        after_help = "EXAMPLES:\n    \
                      # Default threshold from the config\n    \
                      cooc network --input out/0_edgelists/edgelist_ALL.csv\n\n    \
                      # Keep every edge seen more than twice, also write Graphviz DOT\n    \
                      cooc network --input out/0_edgelists/edgelist_FAKE.csv --min-weight 2 --dot"
    )]
    Network(cmd::network::NetworkArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    \
                      # Generate completions for bash\n    \
                      cooc completions bash > ~/.local/share/bash-completion/completions/cooc"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COOC_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cooc=debug,info"
        } else {
            "cooc=info,warn"
        })
    });

    let format = env::var("COOC_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CoocConfig> {
    let cwd = env::current_dir()?;
    resolve_config(cli.config.as_deref(), &cwd)
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Edges(args) => {
            let config = load_config(cli)?;
            cmd::edges::run_edges(args, &config, output)
        }
        Commands::Network(args) => {
            let config = load_config(cli)?;
            cmd::network::run_network(args, &config, output)
        }
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
