//! CLI entry point for the glucose curve analysis.
//!
//! Loads the CGMacros archive, builds post-meal glucose curves per meal type
//! and health group, and writes them to a summary CSV.

use anyhow::{Context, Result};
use clap::Parser;
use glucose_curves::analyzers::analyzer::analyze;
use glucose_curves::{
    loader::load_dataset,
    output::{SUMMARY_FILE, gzip_copy, preview, print_json, print_pretty, write_records},
    schema::Schema,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "glucose_curves")]
#[command(about = "Post-meal glucose response curves by meal type and health group", long_about = None)]
struct Cli {
    /// Zip archive or directory holding bio.csv and CGMacros-<id>.csv files
    #[arg(value_name = "INPUT", default_value = "CGMacros.zip")]
    input: PathBuf,

    /// CSV file to write the curve summary to
    #[arg(short, long, default_value = SUMMARY_FILE)]
    output: PathBuf,

    /// Optional: JSON file overriding column names
    #[arg(long)]
    schema: Option<String>,

    /// Also write a gzip-compressed copy of the summary
    #[arg(long, default_value_t = false)]
    gzip: bool,

    /// Optional: CSV file for the meal macro profile by nutrient focus
    #[arg(long)]
    macro_summary: Option<PathBuf>,

    /// Number of summary rows to log as a preview (0 = none)
    #[arg(long, default_value_t = 5)]
    preview: usize,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/glucose_curves.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("glucose_curves.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

#[tracing::instrument(skip_all, fields(input = %cli.input.display(), output = %cli.output.display()))]
fn run(cli: &Cli) -> Result<()> {
    let schema = match &cli.schema {
        Some(path) => {
            Schema::load(path).with_context(|| format!("Failed to load schema from '{path}'"))?
        }
        None => Schema::default(),
    };

    let dataset = load_dataset(&cli.input, &schema)
        .with_context(|| format!("Failed to load dataset from '{}'", cli.input.display()))?;

    let analysis = analyze(&dataset)?;

    write_records(&cli.output, &analysis.summary)?;
    if cli.gzip {
        let gz = gzip_copy(&cli.output)?;
        info!(path = %gz.display(), "Compressed summary written");
    }

    if let Some(path) = &cli.macro_summary {
        write_records(path, &analysis.macro_summary)?;
    }

    preview(&analysis.summary, cli.preview)?;
    print_pretty(&analysis.stats);
    print_json(&analysis.stats)?;

    info!(
        summary_rows = analysis.stats.summary_rows,
        "Finished writing glucose curves"
    );
    Ok(())
}
