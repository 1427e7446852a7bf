//! Output formatting and persistence for analysis reports.
//!
//! Supports JSON export, a plain-text planning summary, and a CSV history of
//! per-run KPIs.

use anyhow::Result;
use tracing::{debug, info};

use crate::analyzers::summary::percent_label;
use crate::analyzers::types::AnalysisReport;
use crate::stats::RunStats;
use csv::WriterBuilder;
use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::path::Path;

const RULE: &str = "--------------------------------------------------------------------------------";
const BANNER: &str = "================================================================================";

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &AnalysisReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the report as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &str, report: &AnalysisReport) -> Result<()> {
    let body = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, body)?;
    info!(path, "Report written");
    Ok(())
}

/// Renders the human-readable summary report.
pub fn summary_text(report: &AnalysisReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    render_summary(&mut out, report)?;
    Ok(out)
}

fn render_summary(out: &mut String, report: &AnalysisReport) -> fmt::Result {
    writeln!(out, "{BANNER}")?;
    writeln!(out, "TRANSIT PERFORMANCE ANALYSIS REPORT")?;
    writeln!(out, "{BANNER}\n")?;

    writeln!(out, "EXECUTIVE SUMMARY")?;
    writeln!(out, "{RULE}")?;
    for point in &report.executive_summary {
        writeln!(out, "* {point}")?;
    }
    writeln!(out)?;

    writeln!(out, "KEY PERFORMANCE INDICATORS")?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "System On-Time Performance: {}",
        percent_label(report.ontime_performance.system_ontime_pct)
    )?;
    writeln!(out, "Total Boardings: {}", report.data_overview.total_boardings)?;
    writeln!(out, "Routes Analyzed: {}", report.data_overview.unique_routes)?;
    writeln!(out)?;

    writeln!(out, "OPTIMIZATION RECOMMENDATIONS")?;
    writeln!(out, "{RULE}")?;
    for (i, rec) in report.recommendations.iter().enumerate() {
        writeln!(out, "{}. [{:?}] {}", i + 1, rec.priority, rec.action)?;
        writeln!(out, "   Category: {}", rec.category.label())?;
        writeln!(out, "   Rationale: {}", rec.rationale)?;
        writeln!(out, "   Impact: {}", rec.estimated_impact)?;
        if let Some(timeline) = &rec.implementation_timeline {
            writeln!(out, "   Timeline: {timeline}")?;
        }
        if let Some(cost) = &rec.estimated_cost {
            writeln!(out, "   Cost: {cost}")?;
        }
        if let Some(practice) = &rec.best_practice {
            writeln!(out, "   Best Practice: {practice}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "LIMITATIONS")?;
    writeln!(out, "{RULE}")?;
    for limitation in &report.limitations {
        writeln!(out, "* {limitation}")?;
    }

    Ok(())
}

/// Writes [`summary_text`] to `path`.
pub fn write_summary_text(path: &str, report: &AnalysisReport) -> Result<()> {
    std::fs::write(path, summary_text(report)?)?;
    info!(path, "Summary written");
    Ok(())
}

/// Appends a [`RunStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, run_stats: &RunStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(run_stats)?;
    writer.flush()?;

    Ok(())
}
