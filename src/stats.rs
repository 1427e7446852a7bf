use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::types::AnalysisReport;
use crate::recommend::Priority;

/// One flat KPI row per analysis run, for the history CSV.
#[derive(Debug, Default, Serialize)]
pub struct RunStats {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,

    // dataset
    pub total_records: usize,
    pub unique_routes: usize,
    pub total_boardings: u64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub route_conflicts: usize,

    // performance
    pub system_ontime_pct: Option<f64>,
    pub delay_boarding_correlation: Option<f64>,
    pub top_route_id: Option<String>,
    pub top_route_boardings: Option<u64>,

    // recommendations
    pub recommendations: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl RunStats {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let overview = &report.data_overview;
        let top = report.boardings.top_5_routes.first();
        let count = |p: Priority| {
            report
                .recommendations
                .iter()
                .filter(|r| r.priority == p)
                .count()
        };

        RunStats {
            timestamp: report.metadata.generated_at,
            total_records: overview.total_records,
            unique_routes: overview.unique_routes,
            total_boardings: overview.total_boardings,
            start_date: overview.date_range.as_ref().map(|r| r.start.to_string()),
            end_date: overview.date_range.as_ref().map(|r| r.end.to_string()),
            route_conflicts: overview.route_conflicts.len(),
            system_ontime_pct: report.ontime_performance.system_ontime_pct,
            delay_boarding_correlation: report.ontime_performance.delay_boarding_correlation,
            top_route_id: top.map(|r| r.route_id.clone()),
            top_route_boardings: top.map(|r| r.boardings),
            recommendations: report.recommendations.len(),
            high_priority: count(Priority::High),
            medium_priority: count(Priority::Medium),
            low_priority: count(Priority::Low),
            ..Default::default()
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        RunStats {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set the dataset source (path or URL)
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}
