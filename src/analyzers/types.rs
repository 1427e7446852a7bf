//! Data types produced by the analysis pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::Thresholds;
use crate::ingest::RouteConflict;
use crate::recommend::Recommendation;
use crate::segment::TimePeriod;

/// First and last service date in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Dataset-level counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataOverview {
    pub total_records: usize,
    pub date_range: Option<DateRange>,
    pub unique_routes: usize,
    pub total_boardings: u64,
    pub fields: Vec<String>,
    pub blank_counts: BTreeMap<String, usize>,
    pub route_conflicts: Vec<RouteConflict>,
}

/// Ridership totals for one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteBoardings {
    pub route_id: String,
    pub route_name: String,
    pub service_type: String,
    pub boardings: u64,
    pub total_trips: usize,
    pub avg_boardings_per_trip: f64,
}

/// Ridership totals for one time period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBoardings {
    pub time_period: TimePeriod,
    pub sum: u64,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardingsAnalysis {
    pub top_5_routes: Vec<RouteBoardings>,
    pub all_routes: Vec<RouteBoardings>,
    pub period_comparison: Vec<PeriodBoardings>,
}

impl BoardingsAnalysis {
    pub fn period(&self, period: TimePeriod) -> Option<&PeriodBoardings> {
        self.period_comparison
            .iter()
            .find(|p| p.time_period == period)
    }
}

/// Punctuality of one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteReliability {
    pub route_id: String,
    pub route_name: String,
    pub on_time_pct: f64,
    pub avg_delay_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnTimeAnalysis {
    /// `None` when there are no trips.
    pub system_ontime_pct: Option<f64>,
    /// First five routes of `all_routes`.
    pub highest_reliability: Vec<RouteReliability>,
    /// Last five routes of `all_routes`, still in descending order.
    pub lowest_reliability: Vec<RouteReliability>,
    /// `None` when fewer than two routes exist or either series is constant.
    pub delay_boarding_correlation: Option<f64>,
    /// Sorted by `on_time_pct` descending.
    pub all_routes: Vec<RouteReliability>,
}

/// Boardings per revenue hour for one (route, name, service type) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteProductivity {
    pub route_id: String,
    pub route_name: String,
    pub service_type: String,
    pub boardings: u64,
    pub revenue_hours: usize,
    pub boardings_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceTypeProductivity {
    pub service_type: String,
    pub avg_boardings_per_hour: f64,
    pub boardings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityAnalysis {
    pub service_type_productivity: Vec<ServiceTypeProductivity>,
    pub bottom_10_routes: Vec<RouteProductivity>,
    pub all_routes: Vec<RouteProductivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub trip_date: NaiveDate,
    pub on_time_pct: f64,
    pub avg_delay_minutes: f64,
    pub boardings: u64,
}

/// Date-ordered daily series.
///
/// Iterating never consumes the series; every call to [`DailySeries::iter`]
/// yields the same points in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailySeries(pub(crate) Vec<DailyPoint>);

impl DailySeries {
    pub fn iter(&self) -> std::slice::Iter<'_, DailyPoint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a DailySeries {
    type Item = &'a DailyPoint;
    type IntoIter = std::slice::Iter<'a, DailyPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub hour: u32,
    pub is_weekend: bool,
    pub period_type: &'static str,
    pub boardings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub daily_trends: DailySeries,
    pub hourly_patterns: Vec<HourlyPoint>,
}

/// One heatmap row: a route with boardings per time period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub route_id: String,
    pub route_name: String,
    #[serde(flatten)]
    pub periods: BTreeMap<TimePeriod, u64>,
}

/// How each figure in the report was derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Methodology {
    pub time_segmentation: BTreeMap<TimePeriod, &'static str>,
    pub revenue_hour: &'static str,
    pub productivity: &'static str,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub schema_version: u8,
    pub algorithm_version: u8,
    pub generated_at: DateTime<Utc>,
    pub data_period: Option<DateRange>,
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub executive_summary: Vec<String>,
    pub data_overview: DataOverview,
    pub methodology: Methodology,
    pub boardings: BoardingsAnalysis,
    pub ontime_performance: OnTimeAnalysis,
    pub productivity: ProductivityAnalysis,
    pub timeseries: TimeSeries,
    pub heatmap: Vec<HeatmapRow>,
    pub recommendations: Vec<Recommendation>,
    pub limitations: Vec<&'static str>,
}
