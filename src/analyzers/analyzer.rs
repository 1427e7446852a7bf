use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;

use crate::analyzers::boardings::boardings_analysis;
use crate::analyzers::ontime::ontime_analysis;
use crate::analyzers::overview::data_overview;
use crate::analyzers::productivity::productivity_analysis;
use crate::analyzers::series::{heatmap, time_series};
use crate::analyzers::summary::{LIMITATIONS, executive_summary};
use crate::analyzers::types::{
    AnalysisReport, BoardingsAnalysis, Methodology, OnTimeAnalysis, ProductivityAnalysis,
    ReportMetadata,
};
use crate::config::Thresholds;
use crate::error::AnalysisError;
use crate::ingest::ingest;
use crate::parser::TripTable;
use crate::recommend;
use crate::segment::{SegmentedDataset, TimePeriod, segment};

pub const SCHEMA_VERSION: u8 = 1;
pub const ALGORITHM_VERSION: u8 = 1;

/// The three metric families the recommendation rules depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub boardings: BoardingsAnalysis,
    pub ontime: OnTimeAnalysis,
    pub productivity: ProductivityAnalysis,
}

/// Computes the boardings, on-time and productivity families concurrently.
pub fn compute_metrics(dataset: &SegmentedDataset) -> Metrics {
    let (boardings, (ontime, productivity)) = rayon::join(
        || boardings_analysis(dataset),
        || rayon::join(|| ontime_analysis(dataset), || productivity_analysis(dataset)),
    );

    Metrics {
        boardings,
        ontime,
        productivity,
    }
}

/// Runs the full pipeline over `table`.
///
/// Ingestion and segmentation run first; the metric families, the overview
/// and both visualization series then run in parallel against the same
/// segmented dataset. Recommendations are only generated once every metric
/// family has finished.
///
/// # Errors
///
/// Only ingestion can fail, see [`ingest`].
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn analyze(table: &TripTable, thresholds: &Thresholds) -> Result<AnalysisReport, AnalysisError> {
    let dataset = segment(ingest(table, thresholds)?);

    let (metrics, (data_overview, (timeseries, heatmap))) = rayon::join(
        || compute_metrics(&dataset),
        || {
            rayon::join(
                || data_overview(&dataset),
                || rayon::join(|| time_series(&dataset), || heatmap(&dataset)),
            )
        },
    );

    let recommendations = recommend::generate(
        &metrics.boardings,
        &metrics.ontime,
        &metrics.productivity,
        thresholds,
    );

    info!(
        records = data_overview.total_records,
        routes = data_overview.unique_routes,
        system_ontime_pct = ?metrics.ontime.system_ontime_pct,
        recommendations = recommendations.len(),
        "Analysis complete"
    );

    let executive_summary = executive_summary(
        &data_overview,
        &metrics.boardings,
        &metrics.ontime,
        &metrics.productivity,
    );

    Ok(AnalysisReport {
        metadata: ReportMetadata {
            schema_version: SCHEMA_VERSION,
            algorithm_version: ALGORITHM_VERSION,
            generated_at: Utc::now(),
            data_period: data_overview.date_range.clone(),
        },
        executive_summary,
        data_overview,
        methodology: methodology(thresholds),
        boardings: metrics.boardings,
        ontime_performance: metrics.ontime,
        productivity: metrics.productivity,
        timeseries,
        heatmap,
        recommendations,
        limitations: LIMITATIONS.to_vec(),
    })
}

fn methodology(thresholds: &Thresholds) -> Methodology {
    let time_segmentation = BTreeMap::from([
        (TimePeriod::WeekdayAmPeak, "06:00 - 09:00, Monday to Friday"),
        (TimePeriod::WeekdayPmPeak, "15:00 - 19:00, Monday to Friday"),
        (TimePeriod::WeekdayOffPeak, "All other weekday hours"),
        (TimePeriod::WeekendAllDay, "All hours on Saturday and Sunday"),
    ]);

    Methodology {
        time_segmentation,
        revenue_hour: "One completed trip (simplified proxy, not scheduled operating hours)",
        productivity: "Total boardings divided by revenue hours",
        thresholds: thresholds.clone(),
    }
}
