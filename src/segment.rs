//! Time-of-day / day-of-week segmentation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ingest::{RouteConflict, TripDataset, TripRecord};

/// Commute-demand segment a trip falls into.
///
/// Declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TimePeriod {
    #[serde(rename = "Weekday AM Peak")]
    WeekdayAmPeak,
    #[serde(rename = "Weekday PM Peak")]
    WeekdayPmPeak,
    #[serde(rename = "Weekday Off-Peak")]
    WeekdayOffPeak,
    #[serde(rename = "Weekend All Day")]
    WeekendAllDay,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 4] = [
        TimePeriod::WeekdayAmPeak,
        TimePeriod::WeekdayPmPeak,
        TimePeriod::WeekdayOffPeak,
        TimePeriod::WeekendAllDay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimePeriod::WeekdayAmPeak => "Weekday AM Peak",
            TimePeriod::WeekdayPmPeak => "Weekday PM Peak",
            TimePeriod::WeekdayOffPeak => "Weekday Off-Peak",
            TimePeriod::WeekendAllDay => "Weekend All Day",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a departure hour into a [`TimePeriod`].
///
/// | Condition           | Period           |
/// |---------------------|------------------|
/// | weekend             | Weekend All Day  |
/// | 6 <= hour < 9       | Weekday AM Peak  |
/// | 15 <= hour < 19     | Weekday PM Peak  |
/// | otherwise           | Weekday Off-Peak |
pub fn classify(hour: u32, is_weekend: bool) -> TimePeriod {
    match hour {
        _ if is_weekend => TimePeriod::WeekendAllDay,
        6..=8 => TimePeriod::WeekdayAmPeak,
        15..=18 => TimePeriod::WeekdayPmPeak,
        _ => TimePeriod::WeekdayOffPeak,
    }
}

/// A trip paired with its segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedTrip {
    pub trip: TripRecord,
    pub time_period: TimePeriod,
}

/// The dataset every metric family reads from.
#[derive(Debug, Clone, Default)]
pub struct SegmentedDataset {
    pub trips: Vec<SegmentedTrip>,
    pub columns: Vec<String>,
    pub blank_counts: BTreeMap<String, usize>,
    pub route_conflicts: Vec<RouteConflict>,
}

impl SegmentedDataset {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Consumes an ingested dataset and returns it with every trip segmented.
#[tracing::instrument(skip_all, fields(records = dataset.records.len()))]
pub fn segment(dataset: TripDataset) -> SegmentedDataset {
    let trips = dataset
        .records
        .into_iter()
        .map(|trip| SegmentedTrip {
            time_period: classify(trip.hour, trip.is_weekend),
            trip,
        })
        .collect();

    SegmentedDataset {
        trips,
        columns: dataset.columns,
        blank_counts: dataset.blank_counts,
        route_conflicts: dataset.route_conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(5, false), TimePeriod::WeekdayOffPeak);
        assert_eq!(classify(6, false), TimePeriod::WeekdayAmPeak);
        assert_eq!(classify(8, false), TimePeriod::WeekdayAmPeak);
        assert_eq!(classify(9, false), TimePeriod::WeekdayOffPeak);
        assert_eq!(classify(14, false), TimePeriod::WeekdayOffPeak);
        assert_eq!(classify(15, false), TimePeriod::WeekdayPmPeak);
        assert_eq!(classify(18, false), TimePeriod::WeekdayPmPeak);
        assert_eq!(classify(19, false), TimePeriod::WeekdayOffPeak);
    }

    #[test]
    fn test_weekend_overrides_hour() {
        assert_eq!(classify(15, true), TimePeriod::WeekendAllDay);
        assert_eq!(classify(7, true), TimePeriod::WeekendAllDay);
        assert_eq!(classify(0, true), TimePeriod::WeekendAllDay);
    }

    #[test]
    fn test_classify_is_total() {
        for hour in 0..24 {
            for weekend in [false, true] {
                let p = classify(hour, weekend);
                assert!(TimePeriod::ALL.contains(&p));
            }
        }
    }

    #[test]
    fn test_period_serializes_as_label() {
        let json = serde_json::to_string(&TimePeriod::WeekdayOffPeak).unwrap();
        assert_eq!(json, "\"Weekday Off-Peak\"");
        assert_eq!(TimePeriod::WeekendAllDay.to_string(), "Weekend All Day");
    }
}
