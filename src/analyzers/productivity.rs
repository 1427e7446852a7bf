use std::collections::BTreeMap;

use crate::analyzers::types::{ProductivityAnalysis, RouteProductivity, ServiceTypeProductivity};
use crate::analyzers::utility::mean;
use crate::segment::SegmentedDataset;

const BOTTOM_ROUTES: usize = 10;

/// Boardings per revenue hour, by route and by service type.
///
/// One trip counts as one revenue hour. Groups are keyed on
/// (route id, route name, service type), while revenue hours are counted per
/// route id, so a route id with inconsistent attributes spreads its
/// boardings across several groups that share the same revenue hours.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn productivity_analysis(dataset: &SegmentedDataset) -> ProductivityAnalysis {
    let mut trips_per_route: BTreeMap<&str, usize> = BTreeMap::new();
    let mut groups: BTreeMap<(&str, &str, &str), u64> = BTreeMap::new();

    for t in &dataset.trips {
        let trip = &t.trip;
        *trips_per_route.entry(trip.route_id.as_str()).or_default() += 1;
        *groups
            .entry((
                trip.route_id.as_str(),
                trip.route_name.as_str(),
                trip.service_type.as_str(),
            ))
            .or_default() += u64::from(trip.boardings);
    }

    let all_routes: Vec<RouteProductivity> = groups
        .into_iter()
        .map(|((route_id, route_name, service_type), boardings)| {
            let revenue_hours = trips_per_route.get(route_id).copied().unwrap_or(0);
            RouteProductivity {
                route_id: route_id.to_string(),
                route_name: route_name.to_string(),
                service_type: service_type.to_string(),
                boardings,
                revenue_hours,
                boardings_per_hour: boardings as f64 / revenue_hours as f64,
            }
        })
        .collect();

    let mut by_service: BTreeMap<&str, (Vec<f64>, u64)> = BTreeMap::new();
    for r in &all_routes {
        let (rates, boardings) = by_service.entry(r.service_type.as_str()).or_default();
        rates.push(r.boardings_per_hour);
        *boardings += r.boardings;
    }
    let service_type_productivity = by_service
        .into_iter()
        .map(|(service_type, (rates, boardings))| ServiceTypeProductivity {
            service_type: service_type.to_string(),
            avg_boardings_per_hour: mean(&rates),
            boardings,
        })
        .collect();

    let mut bottom_10_routes = all_routes.clone();
    bottom_10_routes.sort_by(|a, b| {
        a.boardings_per_hour
            .total_cmp(&b.boardings_per_hour)
            .then_with(|| a.route_id.cmp(&b.route_id))
            .then_with(|| a.route_name.cmp(&b.route_name))
    });
    bottom_10_routes.truncate(BOTTOM_ROUTES);

    ProductivityAnalysis {
        service_type_productivity,
        bottom_10_routes,
        all_routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::{dataset, trip};

    #[test]
    fn test_boardings_per_revenue_hour() {
        let ds = dataset(vec![
            trip("A", "Alpha", "Local", "2024-03-04", 7, 50, 0.0),
            trip("A", "Alpha", "Local", "2024-03-04", 9, 60, 0.0),
            trip("B", "Beta", "Express", "2024-03-04", 9, 9, 0.0),
        ]);
        let p = productivity_analysis(&ds);

        assert_eq!(p.all_routes.len(), 2);
        assert_eq!(p.all_routes[0].revenue_hours, 2);
        assert_eq!(p.all_routes[0].boardings_per_hour, 55.0);
        assert_eq!(p.bottom_10_routes[0].route_id, "B");
        assert_eq!(p.bottom_10_routes[0].boardings_per_hour, 9.0);
    }

    #[test]
    fn test_service_type_rollup() {
        let ds = dataset(vec![
            trip("A", "", "Local", "2024-03-04", 7, 10, 0.0),
            trip("B", "", "Local", "2024-03-04", 7, 20, 0.0),
            trip("C", "", "Express", "2024-03-04", 7, 40, 0.0),
        ]);
        let p = productivity_analysis(&ds);

        assert_eq!(p.service_type_productivity.len(), 2);
        let express = &p.service_type_productivity[0];
        assert_eq!(express.service_type, "Express");
        assert_eq!(express.boardings, 40);
        let local = &p.service_type_productivity[1];
        assert_eq!(local.avg_boardings_per_hour, 15.0);
        assert_eq!(local.boardings, 30);
    }

    #[test]
    fn test_bottom_10_is_bounded() {
        let trips = (0..12)
            .map(|i| trip(&format!("R{i:02}"), "", "Local", "2024-03-04", 7, i, 0.0))
            .collect();
        let p = productivity_analysis(&dataset(trips));

        assert_eq!(p.bottom_10_routes.len(), 10);
        assert_eq!(p.bottom_10_routes[0].route_id, "R00");
        assert_eq!(p.bottom_10_routes[9].route_id, "R09");
    }

    #[test]
    fn test_inconsistent_names_share_revenue_hours() {
        let ds = dataset(vec![
            trip("A", "Alpha", "Local", "2024-03-04", 7, 10, 0.0),
            trip("A", "Alpha Ltd", "Local", "2024-03-04", 7, 30, 0.0),
        ]);
        let p = productivity_analysis(&ds);

        assert_eq!(p.all_routes.len(), 2);
        assert!(p.all_routes.iter().all(|r| r.revenue_hours == 2));
    }
}
