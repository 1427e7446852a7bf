//! Headline findings and known limitations carried in every report.

use crate::analyzers::types::{
    BoardingsAnalysis, DataOverview, OnTimeAnalysis, ProductivityAnalysis,
};

/// Caveats that apply to every run regardless of input.
pub const LIMITATIONS: [&str; 6] = [
    "Revenue hours are approximated as one completed trip; operator scheduling data would improve accuracy",
    "Seasonal variation is only captured to the extent the input period covers it",
    "Passenger sociodemographic data is not part of the dataset",
    "External factors (weather, special events, construction) are not accounted for",
    "Stop-level dwell time cannot be analysed at trip-level granularity",
    "Route names and service types are taken from the first record of each route id",
];

/// Renders an optional percentage, `n/a` when undefined.
pub fn percent_label(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}%"),
        None => "n/a".to_string(),
    }
}

/// Headline findings, one sentence each.
pub fn executive_summary(
    overview: &DataOverview,
    boardings: &BoardingsAnalysis,
    ontime: &OnTimeAnalysis,
    productivity: &ProductivityAnalysis,
) -> Vec<String> {
    let mut points = Vec::new();

    let period = match &overview.date_range {
        Some(r) => format!("from {} to {}", r.start, r.end),
        None => "with no service dates".to_string(),
    };
    points.push(format!(
        "Analyzed {} trip records across {} routes {}",
        overview.total_records, overview.unique_routes, period
    ));
    points.push(match ontime.system_ontime_pct {
        Some(pct) => format!("System-wide on-time performance at {pct}%"),
        None => "System-wide on-time performance is undefined without trips".to_string(),
    });
    if let Some(top) = boardings.top_5_routes.first() {
        points.push(format!(
            "Route {} ({}) leads ridership with {} total boardings",
            top.route_id, top.route_name, top.boardings
        ));
    }
    if let Some(low) = productivity.bottom_10_routes.first() {
        points.push(format!(
            "Lowest productivity on Route {} ({}) at {:.1} boardings per revenue hour",
            low.route_id, low.route_name, low.boardings_per_hour
        ));
    }
    if !overview.route_conflicts.is_empty() {
        points.push(format!(
            "{} route ids carry inconsistent names or service types; first-seen values were used",
            overview.route_conflicts.len()
        ));
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::boardings::boardings_analysis;
    use crate::analyzers::fixtures::{dataset, trip};
    use crate::analyzers::ontime::ontime_analysis;
    use crate::analyzers::overview::data_overview;
    use crate::analyzers::productivity::productivity_analysis;

    fn summarize(ds: &crate::segment::SegmentedDataset) -> Vec<String> {
        executive_summary(
            &data_overview(ds),
            &boardings_analysis(ds),
            &ontime_analysis(ds),
            &productivity_analysis(ds),
        )
    }

    #[test]
    fn test_executive_summary() {
        let ds = dataset(vec![
            trip("A", "Alpha", "Local", "2024-03-04", 7, 50, 2.0),
            trip("B", "Beta", "Express", "2024-03-09", 12, 3, 1.0),
        ]);
        let points = summarize(&ds);

        assert_eq!(points.len(), 4);
        assert!(points[0].contains("2 trip records across 2 routes from 2024-03-04 to 2024-03-09"));
        assert_eq!(points[1], "System-wide on-time performance at 100%");
        assert!(points[2].contains("Route A (Alpha)"));
        assert!(points[3].contains("Route B (Beta) at 3.0"));
    }

    #[test]
    fn test_executive_summary_without_trips() {
        let points = summarize(&dataset(vec![]));

        assert_eq!(points.len(), 2);
        assert!(points[0].ends_with("with no service dates"));
        assert!(points[1].contains("undefined"));
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(Some(66.67)), "66.67%");
        assert_eq!(percent_label(None), "n/a");
    }
}
