//! CLI entry point for the Ridership Rater tool.
//!
//! Provides subcommands for analyzing a per-trip ridership export and for
//! validating an export without computing any metrics.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use ridership_rater::{
    AnalysisError, Thresholds, analyze,
    fetch::load_source,
    ingest::ingest,
    output::{append_record, write_json, write_summary_text},
    parse_table,
    stats::RunStats,
    upload::{report_key, write_json_to_s3},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ridership_rater")]
#[command(about = "Transit ridership and performance analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a per-trip CSV export from a file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON file to write the full report to
        #[arg(short, long, default_value = "report.json")]
        output: String,

        /// Optional: plain-text summary report path
        #[arg(long)]
        summary: Option<String>,

        /// Optional: CSV file to append a per-run KPI row to
        #[arg(long)]
        history: Option<String>,

        /// Optional: JSON file overriding the default thresholds
        #[arg(short, long)]
        thresholds: Option<String>,

        /// Optional: S3 bucket name to upload the report to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Optional: S3 object key (defaults to reports/date=<today>/report.json)
        #[arg(long, requires = "s3_bucket")]
        s3_key: Option<String>,

        /// Optional: Gzip compress the report before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Validate a per-trip CSV export without computing metrics
    Validate {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ridership_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ridership_rater.log"));

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

    match cli.command {
        Commands::Analyze {
            source,
            output,
            summary,
            history,
            thresholds,
            s3_bucket,
            s3_key,
            gzip,
        } => {
            let thresholds = match thresholds {
                Some(path) => Thresholds::load(&path)?,
                None => Thresholds::default(),
            };

            let bytes = load_source(&source).await?;

            // the pipeline is CPU-bound; keep it off the async workers
            let result = tokio::task::spawn_blocking(move || {
                let table = parse_table(&bytes)?;
                analyze(&table, &thresholds)
            })
            .await?;

            let report = match result {
                Ok(report) => report,
                Err(e) => {
                    error!(error = %e, "Analysis failed");
                    if let Some(history) = &history {
                        let error_stats = RunStats::from_error(error_kind(&e), &e.to_string())
                            .with_source(&source);
                        let _ = append_record(history, &error_stats);
                    }
                    return Err(e.into());
                }
            };

            write_json(&output, &report)?;

            if let Some(path) = &summary {
                write_summary_text(path, &report)?;
            }

            if let Some(path) = &history {
                append_record(path, &RunStats::from_report(&report).with_source(&source))?;
            }

            if let Some(bucket) = s3_bucket {
                let config = aws_config::load_from_env().await;
                let s3 = aws_sdk_s3::Client::new(&config);
                let key = s3_key.unwrap_or_else(|| report_key(Utc::now().date_naive(), gzip));
                info!(bucket = %bucket, key = %key, gzip, "S3 upload enabled");
                write_json_to_s3(&s3, &bucket, &key, &report, gzip).await?;
            }
        }
        Commands::Validate { source } => {
            let bytes = load_source(&source).await?;
            let table = parse_table(&bytes)?;
            let dataset = ingest(&table, &Thresholds::default())?;

            for (column, blanks) in dataset.blank_counts.iter().filter(|(_, n)| **n > 0) {
                warn!(column = %column, blanks, "Blank cells");
            }

            info!(
                records = dataset.records.len(),
                columns = dataset.columns.len(),
                route_conflicts = dataset.route_conflicts.len(),
                "Dataset is valid"
            );
        }
    }

    Ok(())
}

fn error_kind(e: &AnalysisError) -> &'static str {
    match e {
        AnalysisError::Schema { .. } => "schema_error",
        AnalysisError::Parse { .. } => "parse_error",
        AnalysisError::Csv(_) => "csv_error",
    }
}
