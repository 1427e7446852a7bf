use ridership_rater::recommend::Category;
use ridership_rater::segment::TimePeriod;
use ridership_rater::{AnalysisError, AnalysisReport, Thresholds, analyze, parse_table};

fn sample_report() -> AnalysisReport {
    let bytes = include_bytes!("fixtures/sample_trips.csv");
    let table = parse_table(bytes).expect("Failed to parse fixture");
    analyze(&table, &Thresholds::default()).expect("Failed to analyze fixture")
}

#[test]
fn test_full_pipeline() {
    let report = sample_report();

    assert_eq!(report.data_overview.total_records, 24);
    assert_eq!(report.data_overview.unique_routes, 7);
    assert_eq!(report.data_overview.total_boardings, 725);
    assert!(report.data_overview.route_conflicts.is_empty());
    assert_eq!(report.ontime_performance.system_ontime_pct, Some(66.67));
    assert_eq!(report.timeseries.daily_trends.len(), 4);
}

#[test]
fn test_route_boardings_sum_to_overview_total() {
    let report = sample_report();
    let per_route: u64 = report.boardings.all_routes.iter().map(|r| r.boardings).sum();
    assert_eq!(per_route, report.data_overview.total_boardings);
}

#[test]
fn test_top_routes_are_ranked() {
    let report = sample_report();
    let top = &report.boardings.top_5_routes;

    assert_eq!(top.len(), 5);
    assert_eq!(top[0].route_id, "101");
    assert!(top.windows(2).all(|w| w[0].boardings >= w[1].boardings));
}

#[test]
fn test_recommendations_follow_priority_order() {
    let report = sample_report();
    let recs = &report.recommendations;

    assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));
    assert!(
        recs.iter()
            .any(|r| r.action.contains("reliability improvement program"))
    );
    assert!(recs.iter().any(|r| r.category == Category::CustomerExperience));
    assert!(!recs.iter().any(|r| r.category == Category::TechnologyInnovation));
}

#[test]
fn test_heatmap_has_every_present_period() {
    let report = sample_report();

    assert_eq!(report.heatmap.len(), 7);
    for row in &report.heatmap {
        assert_eq!(row.periods.len(), TimePeriod::ALL.len());
    }
}

#[test]
fn test_repeat_runs_are_identical() {
    let a = sample_report();
    let b = sample_report();

    let sections = |r: &AnalysisReport| {
        serde_json::to_string(&(
            &r.data_overview,
            &r.boardings,
            &r.ontime_performance,
            &r.productivity,
            &r.timeseries,
            &r.heatmap,
            &r.recommendations,
        ))
        .unwrap()
    };
    assert_eq!(sections(&a), sections(&b));
}

#[test]
fn test_missing_columns_abort() {
    let csv = b"route_id,route_name,boardings\n101,King Street,12\n";
    let table = parse_table(csv).unwrap();
    let err = analyze(&table, &Thresholds::default()).unwrap_err();

    match err {
        AnalysisError::Schema { missing } => assert_eq!(missing.len(), 6),
        other => panic!("expected schema error, got {other:?}"),
    }
}
