use std::collections::BTreeSet;

use crate::analyzers::types::{DataOverview, DateRange};
use crate::segment::SegmentedDataset;

/// Record counts, service period and validation findings for the dataset.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn data_overview(dataset: &SegmentedDataset) -> DataOverview {
    let dates = dataset.trips.iter().map(|t| t.trip.trip_date);
    let date_range = dates
        .clone()
        .min()
        .zip(dates.max())
        .map(|(start, end)| DateRange { start, end });

    let unique_routes = dataset
        .trips
        .iter()
        .map(|t| t.trip.route_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    DataOverview {
        total_records: dataset.len(),
        date_range,
        unique_routes,
        total_boardings: dataset
            .trips
            .iter()
            .map(|t| u64::from(t.trip.boardings))
            .sum(),
        fields: dataset.columns.clone(),
        blank_counts: dataset.blank_counts.clone(),
        route_conflicts: dataset.route_conflicts.clone(),
    }
}
