//! Time series and heatmap shapes for visualization consumers.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::analyzers::types::{DailyPoint, DailySeries, HeatmapRow, HourlyPoint, TimeSeries};
use crate::analyzers::utility::pct;
use crate::segment::{SegmentedDataset, TimePeriod};

#[derive(Default)]
struct DayAcc {
    trips: usize,
    on_time: usize,
    delay_sum: f64,
    boardings: u64,
}

/// One point per service date, in date order.
pub fn daily_trends(dataset: &SegmentedDataset) -> DailySeries {
    let mut days: BTreeMap<NaiveDate, DayAcc> = BTreeMap::new();

    for t in &dataset.trips {
        let acc = days.entry(t.trip.trip_date).or_default();
        acc.trips += 1;
        acc.delay_sum += t.trip.delay_minutes;
        acc.boardings += u64::from(t.trip.boardings);
        if t.trip.on_time {
            acc.on_time += 1;
        }
    }

    DailySeries(
        days.into_iter()
            .map(|(trip_date, d)| DailyPoint {
                trip_date,
                on_time_pct: pct(d.on_time, d.trips),
                avg_delay_minutes: d.delay_sum / d.trips as f64,
                boardings: d.boardings,
            })
            .collect(),
    )
}

/// Boardings by departure hour, split weekday/weekend.
pub fn hourly_patterns(dataset: &SegmentedDataset) -> Vec<HourlyPoint> {
    let mut hours: BTreeMap<(u32, bool), u64> = BTreeMap::new();

    for t in &dataset.trips {
        *hours.entry((t.trip.hour, t.trip.is_weekend)).or_default() += u64::from(t.trip.boardings);
    }

    hours
        .into_iter()
        .map(|((hour, is_weekend), boardings)| HourlyPoint {
            hour,
            is_weekend,
            period_type: if is_weekend { "Weekend" } else { "Weekday" },
            boardings,
        })
        .collect()
}

#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn time_series(dataset: &SegmentedDataset) -> TimeSeries {
    TimeSeries {
        daily_trends: daily_trends(dataset),
        hourly_patterns: hourly_patterns(dataset),
    }
}

/// Boardings per route and time period, one row per (route id, route name).
///
/// Every row carries a column for each period present anywhere in the
/// dataset; combinations with no trips are 0.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn heatmap(dataset: &SegmentedDataset) -> Vec<HeatmapRow> {
    let present: BTreeSet<TimePeriod> = dataset.trips.iter().map(|t| t.time_period).collect();
    let mut cells: BTreeMap<(&str, &str), BTreeMap<TimePeriod, u64>> = BTreeMap::new();

    for t in &dataset.trips {
        let row = cells
            .entry((t.trip.route_id.as_str(), t.trip.route_name.as_str()))
            .or_default();
        *row.entry(t.time_period).or_default() += u64::from(t.trip.boardings);
    }

    cells
        .into_iter()
        .map(|((route_id, route_name), mut periods)| {
            for p in &present {
                periods.entry(*p).or_insert(0);
            }
            HeatmapRow {
                route_id: route_id.to_string(),
                route_name: route_name.to_string(),
                periods,
            }
        })
        .collect()
}
