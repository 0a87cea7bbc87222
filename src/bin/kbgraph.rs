//! kbgraph CLI: analyze a Logseq-style graph directory.
//!
//! Usage:
//!   kbgraph analyze <GRAPH> [--out DIR] [--format markdown|json]
//!   kbgraph report <summary|network|tags|tasks> <GRAPH>

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use kbgraph::{AnalysisReport, KbConfig, KbResult, KnowledgeBase, ReportKind, TagCountMode};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kbgraph",
    version,
    about = "Link, tag and task analysis for Logseq-style knowledge bases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <GRAPH>/kbgraph.yaml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pages with more links than this in either direction are hubs
    #[arg(long, global = true)]
    hub_threshold: Option<usize>,

    /// Reference date for overdue tasks (YYYY-MM-DD, default: today)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Decimal places for averages and percentages
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Rank tags by occurrences or by documents
    #[arg(long, global = true)]
    tag_count: Option<TagCountMode>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every report
    Analyze {
        /// Graph directory
        graph: PathBuf,
        /// Write reports into this directory instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,
    },
    /// Print a single report
    Report {
        /// summary, network, tags or tasks
        kind: ReportKind,
        /// Graph directory
        graph: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

struct Overrides {
    config: Option<PathBuf>,
    hub_threshold: Option<usize>,
    precision: Option<usize>,
    tag_count: Option<TagCountMode>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("kbgraph=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load settings for a graph and apply command-line overrides
fn load_config(graph: &Path, overrides: &Overrides) -> KbResult<KbConfig> {
    let mut config = KbConfig::load(overrides.config.as_deref(), graph)?;
    if let Some(threshold) = overrides.hub_threshold {
        config.hub_threshold = threshold;
    }
    if let Some(precision) = overrides.precision {
        config.decimal_places = precision;
    }
    if let Some(mode) = overrides.tag_count {
        config.tag_count_mode = mode;
    }
    Ok(config)
}

fn run_analysis(
    rt: &Runtime,
    graph: &Path,
    overrides: &Overrides,
    as_of: NaiveDate,
) -> KbResult<(KnowledgeBase, AnalysisReport)> {
    let config = load_config(graph, overrides)?;
    let kb = KnowledgeBase::open(graph, config)?;
    let report = rt.block_on(kb.analyze(as_of))?;
    Ok((kb, report))
}

fn cmd_analyze(
    rt: &Runtime,
    graph: &Path,
    out: Option<&Path>,
    format: OutputFormat,
    overrides: &Overrides,
    as_of: NaiveDate,
) -> i32 {
    let (kb, report) = match run_analysis(rt, graph, overrides, as_of) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let result = match (out, format) {
        (Some(dir), OutputFormat::Markdown) => kb.write_reports(&report, dir).map(|paths| {
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }),
        (Some(dir), OutputFormat::Json) => kb
            .write_json(&report, dir)
            .map(|path| println!("Wrote {}", path.display())),
        (None, OutputFormat::Markdown) => {
            let rendered: Vec<String> = kb
                .renderer()
                .render_all(&report)
                .into_iter()
                .map(|(_, text)| text)
                .collect();
            print!("{}", rendered.join("\n"));
            Ok(())
        }
        (None, OutputFormat::Json) => kb
            .renderer()
            .render_json(&report)
            .map(|json| println!("{}", json))
            .map_err(Into::into),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_report(
    rt: &Runtime,
    graph: &Path,
    kind: ReportKind,
    overrides: &Overrides,
    as_of: NaiveDate,
) -> i32 {
    match run_analysis(rt, graph, overrides, as_of) {
        Ok((kb, report)) => {
            print!("{}", kb.render(kind, &report));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let overrides = Overrides {
        config: cli.config,
        hub_threshold: cli.hub_threshold,
        precision: cli.precision,
        tag_count: cli.tag_count,
    };

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Analyze { graph, out, format } => {
            cmd_analyze(&rt, &graph, out.as_deref(), format, &overrides, as_of)
        }
        Commands::Report { kind, graph } => cmd_report(&rt, &graph, kind, &overrides, as_of),
    };
    std::process::exit(code);
}
