//! Business thresholds used by ingestion and the recommendation rules.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A trip is on time when it arrives at most this many minutes late.
pub const ON_TIME_THRESHOLD_MINUTES: f64 = 5.0;
/// Routes below this on-time percentage are candidates for transit priority.
pub const UNRELIABLE_ROUTE_PCT: f64 = 75.0;
/// Average boardings per trip above which a route is treated as crowded.
pub const CROWDED_BOARDINGS_PER_TRIP: f64 = 40.0;
/// Productivity below which a route is a microtransit candidate.
pub const MICROTRANSIT_BOARDINGS_PER_HOUR: f64 = 8.0;
/// Productivity below which a route gets an equity review.
pub const EQUITY_REVIEW_BOARDINGS_PER_HOUR: f64 = 12.0;
/// Weekday AM peak boardings above which feeder integration is suggested.
pub const REGIONAL_FEEDER_PEAK_BOARDINGS: u64 = 50_000;
/// System on-time percentage above which forecasting investment is suggested.
pub const TECHNOLOGY_ONTIME_PCT: f64 = 80.0;
/// Industry on-time standard; below it a reliability program is suggested.
pub const RELIABILITY_PROGRAM_ONTIME_PCT: f64 = 85.0;

/// Named thresholds for a single analysis run.
///
/// Stored as a JSON object on disk, every key optional:
/// ```json
/// {
///   "on_time_minutes": 5.0,
///   "regional_feeder_peak_boardings": 50000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub on_time_minutes: f64,
    pub unreliable_route_pct: f64,
    pub crowded_boardings_per_trip: f64,
    pub microtransit_boardings_per_hour: f64,
    pub equity_review_boardings_per_hour: f64,
    pub regional_feeder_peak_boardings: u64,
    pub technology_ontime_pct: f64,
    pub reliability_program_ontime_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            on_time_minutes: ON_TIME_THRESHOLD_MINUTES,
            unreliable_route_pct: UNRELIABLE_ROUTE_PCT,
            crowded_boardings_per_trip: CROWDED_BOARDINGS_PER_TRIP,
            microtransit_boardings_per_hour: MICROTRANSIT_BOARDINGS_PER_HOUR,
            equity_review_boardings_per_hour: EQUITY_REVIEW_BOARDINGS_PER_HOUR,
            regional_feeder_peak_boardings: REGIONAL_FEEDER_PEAK_BOARDINGS,
            technology_ontime_pct: TECHNOLOGY_ONTIME_PCT,
            reliability_program_ontime_pct: RELIABILITY_PROGRAM_ONTIME_PCT,
        }
    }
}

impl Thresholds {
    /// Loads thresholds from a JSON file at `path`. Missing keys keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t: Thresholds = serde_json::from_str(r#"{"on_time_minutes": 3.0}"#).unwrap();
        assert_eq!(t.on_time_minutes, 3.0);
        assert_eq!(t.regional_feeder_peak_boardings, 50_000);
        assert_eq!(t.reliability_program_ontime_pct, 85.0);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(Thresholds::load("/nonexistent/thresholds.json").is_err());
    }
}
