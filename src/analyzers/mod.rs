//! Metric families, time series and the end-to-end analysis pipeline.
//!
//! Every family reads the same frozen [`SegmentedDataset`](crate::segment::SegmentedDataset)
//! and has no dependency on the others, so [`analyzer::analyze`] runs them
//! side by side before handing the metrics to the recommendation rules.

pub mod analyzer;
pub mod boardings;
pub mod ontime;
pub mod overview;
pub mod productivity;
pub mod series;
pub mod summary;
pub mod types;
pub mod utility;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Datelike, Duration, NaiveDate};

    use crate::ingest::TripRecord;
    use crate::segment::{SegmentedDataset, SegmentedTrip, classify};

    /// Builds a segmented trip departing at `hour` on `date`, arriving `delay` minutes late.
    pub fn trip(
        route_id: &str,
        route_name: &str,
        service_type: &str,
        date: &str,
        hour: u32,
        boardings: u32,
        delay: f64,
    ) -> SegmentedTrip {
        let trip_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let departure = trip_date.and_hms_opt(hour, 0, 0).unwrap();
        let scheduled_arrival = departure + Duration::minutes(40);
        let actual_arrival = scheduled_arrival + Duration::milliseconds((delay * 60_000.0) as i64);
        let day_of_week = trip_date.weekday().num_days_from_monday();
        let is_weekend = day_of_week >= 5;

        SegmentedTrip {
            trip: TripRecord {
                route_id: route_id.to_string(),
                route_name: route_name.to_string(),
                service_type: service_type.to_string(),
                scheduled_departure: departure,
                actual_departure: departure,
                scheduled_arrival,
                actual_arrival,
                boardings,
                trip_date,
                delay_minutes: delay,
                on_time: delay <= 5.0,
                hour,
                day_of_week,
                is_weekend,
            },
            time_period: classify(hour, is_weekend),
        }
    }

    pub fn dataset(trips: Vec<SegmentedTrip>) -> SegmentedDataset {
        SegmentedDataset {
            trips,
            ..Default::default()
        }
    }
}
