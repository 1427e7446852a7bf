use std::collections::BTreeMap;

use crate::analyzers::types::{BoardingsAnalysis, PeriodBoardings, RouteBoardings};
use crate::segment::{SegmentedDataset, TimePeriod};

const TOP_ROUTES: usize = 5;

/// Ridership by route and by time period.
///
/// Route name and service type are the first values seen for each route id.
/// `top_5_routes` breaks ties on boardings by ascending route id.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn boardings_analysis(dataset: &SegmentedDataset) -> BoardingsAnalysis {
    let mut routes: BTreeMap<&str, RouteBoardings> = BTreeMap::new();
    let mut periods: BTreeMap<TimePeriod, (u64, usize)> = BTreeMap::new();

    for t in &dataset.trips {
        let trip = &t.trip;
        let route = routes
            .entry(trip.route_id.as_str())
            .or_insert_with(|| RouteBoardings {
                route_id: trip.route_id.clone(),
                route_name: trip.route_name.clone(),
                service_type: trip.service_type.clone(),
                boardings: 0,
                total_trips: 0,
                avg_boardings_per_trip: 0.0,
            });
        route.boardings += u64::from(trip.boardings);
        route.total_trips += 1;

        let (sum, count) = periods.entry(t.time_period).or_default();
        *sum += u64::from(trip.boardings);
        *count += 1;
    }

    let all_routes: Vec<RouteBoardings> = routes
        .into_values()
        .map(|mut r| {
            r.avg_boardings_per_trip = r.boardings as f64 / r.total_trips as f64;
            r
        })
        .collect();

    let mut top_5_routes = all_routes.clone();
    top_5_routes.sort_by(|a, b| {
        b.boardings
            .cmp(&a.boardings)
            .then_with(|| a.route_id.cmp(&b.route_id))
    });
    top_5_routes.truncate(TOP_ROUTES);

    let period_comparison = periods
        .into_iter()
        .map(|(time_period, (sum, count))| PeriodBoardings {
            time_period,
            sum,
            mean: sum as f64 / count as f64,
            count,
        })
        .collect();

    BoardingsAnalysis {
        top_5_routes,
        all_routes,
        period_comparison,
    }
}
