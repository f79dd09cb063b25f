use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use catalog_match::{
    normalize, normalized_similarity, Catalog, MatchConfig, MatchReport, MatchingEngine, VERSION,
};

#[derive(Parser)]
#[command(name = "catalog-match")]
#[command(version = VERSION, long_about = None)]
#[command(about = "Find duplicated functions/services across two catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match catalog A against catalog B
    Match {
        /// Catalog A source (.json, .csv or file.db#table)
        a: String,

        /// Catalog B source (.json, .csv or file.db#table)
        b: String,

        /// Label for catalog A
        #[arg(long, default_value = "A")]
        label_a: String,

        /// Label for catalog B
        #[arg(long, default_value = "B")]
        label_b: String,

        /// JSON file with weights/threshold overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        format: OutputFormat,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the normalized form of a text
    Normalize {
        text: String,
    },

    /// Print the similarity of two texts after normalization
    Compare {
        a: String,
        b: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Match {
            a,
            b,
            label_a,
            label_b,
            config,
            format,
            output,
        } => run_match(&a, &b, &label_a, &label_b, config, format, output)?,
        Commands::Normalize { text } => println!("{}", normalize(&text)),
        Commands::Compare { a, b } => println!("{:.4}", normalized_similarity(&a, &b)),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_match(
    source_a: &str,
    source_b: &str,
    label_a: &str,
    label_b: &str,
    config_path: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => MatchConfig::load(&path)?,
        None => MatchConfig::default(),
    };
    let engine = MatchingEngine::from_config(&config)?;

    let a = Catalog::load(label_a, source_a)?;
    let b = Catalog::load(label_b, source_b)?;

    let report = MatchReport::run(&engine, &a, &b);

    match (format, output) {
        (OutputFormat::Summary, _) => print_summary(&report),
        (OutputFormat::Json, Some(path)) => {
            report.write_json(&path)?;
            println!("✓ Report written to {}", path.display());
        }
        (OutputFormat::Json, None) => println!("{}", report.to_json()?),
        (OutputFormat::Csv, Some(path)) => {
            report.export_csv(&path)?;
            println!("✓ Report written to {}", path.display());
        }
        (OutputFormat::Csv, None) => report
            .write_csv(std::io::stdout().lock())
            .context("Failed to write CSV to stdout")?,
    }

    Ok(())
}

fn print_summary(report: &MatchReport) {
    println!("🔍 {} vs {}", report.label_a, report.label_b);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for m in &report.result.matches {
        println!("  {} ↔ {}  [{}]", m.a.name, m.b.name, m.similarity_percent());
    }

    println!("\n⚠️  Unique to {}: {}", report.label_a, report.result.unmatched_a.len());
    for r in &report.result.unmatched_a {
        println!("  {} ({})", r.name, r.area);
    }

    println!("\n⚠️  Unique to {}: {}", report.label_b, report.result.unmatched_b.len());
    for r in &report.result.unmatched_b {
        println!("  {} ({})", r.name, r.area);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", report.stats.summary());

    let skipped = report.skipped_a.len() + report.skipped_b.len();
    if skipped > 0 {
        println!("Skipped {} malformed records (see warnings above)", skipped);
    }
}
