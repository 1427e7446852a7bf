use std::collections::BTreeMap;

use tracing::debug;

use crate::analyzers::types::{OnTimeAnalysis, RouteReliability};
use crate::analyzers::utility::{pct, pearson, round_to};
use crate::segment::SegmentedDataset;

const RELIABILITY_SLICE: usize = 5;

#[derive(Default)]
struct RouteAcc<'a> {
    route_name: &'a str,
    trips: usize,
    on_time: usize,
    delay_sum: f64,
    boardings: u64,
}

/// System and per-route on-time performance.
///
/// Routes are ranked by on-time percentage, descending, ties by route id.
/// With fewer than ten routes the highest and lowest slices overlap.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn ontime_analysis(dataset: &SegmentedDataset) -> OnTimeAnalysis {
    let mut routes: BTreeMap<&str, RouteAcc> = BTreeMap::new();
    let mut on_time_total = 0usize;

    for t in &dataset.trips {
        let trip = &t.trip;
        let acc = routes
            .entry(trip.route_id.as_str())
            .or_insert_with(|| RouteAcc {
                route_name: &trip.route_name,
                ..Default::default()
            });
        acc.trips += 1;
        acc.delay_sum += trip.delay_minutes;
        acc.boardings += u64::from(trip.boardings);
        if trip.on_time {
            acc.on_time += 1;
            on_time_total += 1;
        }
    }

    let system_ontime_pct =
        (!dataset.is_empty()).then(|| round_to(pct(on_time_total, dataset.len()), 2));

    // correlation inputs, aligned by route id
    let (boardings, delays): (Vec<f64>, Vec<f64>) = routes
        .values()
        .map(|r| (r.boardings as f64, r.delay_sum / r.trips as f64))
        .unzip();
    let delay_boarding_correlation = pearson(&boardings, &delays).map(|r| round_to(r, 3));
    if delay_boarding_correlation.is_none() {
        debug!(routes = routes.len(), "Delay/boarding correlation undefined");
    }

    let mut all_routes: Vec<RouteReliability> = routes
        .into_iter()
        .map(|(id, r)| RouteReliability {
            route_id: id.to_string(),
            route_name: r.route_name.to_string(),
            on_time_pct: round_to(pct(r.on_time, r.trips), 2),
            avg_delay_minutes: r.delay_sum / r.trips as f64,
        })
        .collect();
    all_routes.sort_by(|a, b| {
        b.on_time_pct
            .total_cmp(&a.on_time_pct)
            .then_with(|| a.route_id.cmp(&b.route_id))
    });

    let highest_reliability = all_routes.iter().take(RELIABILITY_SLICE).cloned().collect();
    let lowest_reliability =
        all_routes[all_routes.len().saturating_sub(RELIABILITY_SLICE)..].to_vec();

    OnTimeAnalysis {
        system_ontime_pct,
        highest_reliability,
        lowest_reliability,
        delay_boarding_correlation,
        all_routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::{dataset, trip};

    #[test]
    fn test_single_route_half_on_time() {
        let ds = dataset(vec![
            trip("A", "Alpha", "Local", "2024-03-04", 7, 50, 2.0),
            trip("A", "Alpha", "Local", "2024-03-04", 8, 60, 8.0),
        ]);
        let o = ontime_analysis(&ds);

        assert_eq!(o.system_ontime_pct, Some(50.0));
        assert_eq!(o.all_routes.len(), 1);
        assert_eq!(o.all_routes[0].on_time_pct, 50.0);
        assert_eq!(o.all_routes[0].avg_delay_minutes, 5.0);
        // a single route cannot be correlated
        assert_eq!(o.delay_boarding_correlation, None);
    }

    #[test]
    fn test_system_pct_is_rounded() {
        let ds = dataset(vec![
            trip("A", "", "Local", "2024-03-04", 7, 1, 0.0),
            trip("A", "", "Local", "2024-03-04", 7, 1, 0.0),
            trip("A", "", "Local", "2024-03-04", 7, 1, 9.0),
        ]);
        assert_eq!(ontime_analysis(&ds).system_ontime_pct, Some(66.67));
    }

    #[test]
    fn test_ranking_and_slices_overlap() {
        let ds = dataset(vec![
            trip("R1", "", "Local", "2024-03-04", 7, 10, 10.0),
            trip("R2", "", "Local", "2024-03-04", 7, 20, 0.0),
            trip("R3", "", "Local", "2024-03-04", 7, 30, 0.0),
            trip("R3", "", "Local", "2024-03-04", 7, 30, 10.0),
        ]);
        let o = ontime_analysis(&ds);

        let ids: Vec<_> = o.all_routes.iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(ids, vec!["R2", "R3", "R1"]);
        assert_eq!(o.highest_reliability, o.all_routes);
        assert_eq!(o.lowest_reliability, o.all_routes);
    }

    #[test]
    fn test_lowest_is_tail_of_ranking() {
        let trips = (0..7)
            .map(|i| {
                let delay = if i < 3 { 0.0 } else { 10.0 };
                trip(&format!("R{i}"), "", "Local", "2024-03-04", 7, 10, delay)
            })
            .collect();
        let o = ontime_analysis(&dataset(trips));

        assert_eq!(o.highest_reliability.len(), 5);
        assert_eq!(o.lowest_reliability.len(), 5);
        assert_eq!(o.lowest_reliability[0].route_id, "R2");
        assert_eq!(o.lowest_reliability[4].route_id, "R6");
    }

    #[test]
    fn test_correlation_positive() {
        let ds = dataset(vec![
            trip("R1", "", "Local", "2024-03-04", 7, 10, 1.0),
            trip("R2", "", "Local", "2024-03-04", 7, 20, 2.0),
            trip("R3", "", "Local", "2024-03-04", 7, 30, 3.0),
        ]);
        assert_eq!(ontime_analysis(&ds).delay_boarding_correlation, Some(1.0));
    }

    #[test]
    fn test_correlation_zero_variance() {
        let ds = dataset(vec![
            trip("R1", "", "Local", "2024-03-04", 7, 10, 1.0),
            trip("R2", "", "Local", "2024-03-04", 7, 20, 1.0),
        ]);
        assert_eq!(ontime_analysis(&ds).delay_boarding_correlation, None);
    }

    #[test]
    fn test_correlation_constant_mean_delays() {
        let ds = dataset(vec![
            trip("R1", "", "Local", "2024-03-04", 7, 10, 0.1),
            trip("R1", "", "Local", "2024-03-04", 8, 10, 0.2),
            trip("R2", "", "Local", "2024-03-04", 7, 20, 0.15),
            trip("R3", "", "Local", "2024-03-04", 7, 30, 0.15),
        ]);
        assert_eq!(ontime_analysis(&ds).delay_boarding_correlation, None);
    }

    #[test]
    fn test_empty_dataset() {
        let o = ontime_analysis(&dataset(vec![]));
        assert_eq!(o.system_ontime_pct, None);
        assert!(o.lowest_reliability.is_empty());
        assert_eq!(o.delay_boarding_correlation, None);
    }
}
