//! Schema validation and per-record derivation.
//!
//! [`ingest`] turns a raw [`TripTable`] into a frozen [`TripDataset`]. Any
//! missing column or unparseable cell aborts the whole run; there is no
//! skip-and-continue.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Thresholds;
use crate::error::AnalysisError;
use crate::parser::TripTable;

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "route_id",
    "route_name",
    "service_type",
    "scheduled_departure",
    "actual_departure",
    "scheduled_arrival",
    "actual_arrival",
    "boardings",
    "trip_date",
];

/// Columns kept verbatim; every other required column is parsed and cannot be blank.
pub const TEXT_COLUMNS: [&str; 3] = ["route_id", "route_name", "service_type"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A validated trip with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub route_id: String,
    pub route_name: String,
    pub service_type: String,
    pub scheduled_departure: NaiveDateTime,
    pub actual_departure: NaiveDateTime,
    pub scheduled_arrival: NaiveDateTime,
    pub actual_arrival: NaiveDateTime,
    pub boardings: u32,
    pub trip_date: NaiveDate,

    pub delay_minutes: f64,
    pub on_time: bool,
    pub hour: u32,
    /// Monday = 0.
    pub day_of_week: u32,
    pub is_weekend: bool,
}

/// A route_id seen with more than one name or service type.
///
/// Aggregations keep the first-seen value; the conflict is surfaced here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteConflict {
    pub route_id: String,
    pub route_names: Vec<String>,
    pub service_types: Vec<String>,
}

/// The immutable output of ingestion.
#[derive(Debug, Clone, Default)]
pub struct TripDataset {
    pub records: Vec<TripRecord>,
    pub columns: Vec<String>,
    pub blank_counts: BTreeMap<String, usize>,
    pub route_conflicts: Vec<RouteConflict>,
}

/// Returns `true` when a trip arriving `delay_minutes` late counts as on time.
///
/// Only an upper bound is applied: arbitrarily early arrivals are on time.
pub fn is_on_time(delay_minutes: f64, threshold_minutes: f64) -> bool {
    delay_minutes <= threshold_minutes
}

/// Validates `table` and derives delay, punctuality and calendar fields.
///
/// # Errors
///
/// [`AnalysisError::Schema`] if any required column is absent, listing all
/// of them. [`AnalysisError::Parse`] on the first timestamp, date or
/// boardings cell that does not parse.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn ingest(table: &TripTable, thresholds: &Thresholds) -> Result<TripDataset, AnalysisError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::Schema { missing });
    }

    // every required column is present past this point
    let idx: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|c| table.column_index(c))
        .collect();

    let mut blank_counts: BTreeMap<String, usize> = TEXT_COLUMNS
        .iter()
        .map(|c| (c.to_string(), 0))
        .collect();

    let mut records = Vec::with_capacity(table.len());

    for (i, row) in table.rows.iter().enumerate() {
        let row_no = i + 1;
        let cells: Vec<&str> = idx
            .iter()
            .map(|&j| row.get(j).map(String::as_str).unwrap_or(""))
            .collect();

        for (name, cell) in TEXT_COLUMNS.iter().zip(&cells) {
            if cell.is_empty() {
                if let Some(n) = blank_counts.get_mut(*name) {
                    *n += 1;
                }
            }
        }

        let datetime = |k: usize| -> Result<NaiveDateTime, AnalysisError> {
            parse_datetime(cells[k]).ok_or_else(|| {
                AnalysisError::parse(REQUIRED_COLUMNS[k], row_no, cells[k])
            })
        };

        let scheduled_departure = datetime(3)?;
        let actual_departure = datetime(4)?;
        let scheduled_arrival = datetime(5)?;
        let actual_arrival = datetime(6)?;

        let boardings: u32 = cells[7]
            .parse()
            .map_err(|_| AnalysisError::parse("boardings", row_no, cells[7]))?;

        let trip_date = parse_date(cells[8])
            .ok_or_else(|| AnalysisError::parse("trip_date", row_no, cells[8]))?;

        let delay_minutes =
            (actual_arrival - scheduled_arrival).num_milliseconds() as f64 / 60_000.0;
        let day_of_week = trip_date.weekday().num_days_from_monday();

        records.push(TripRecord {
            route_id: cells[0].to_string(),
            route_name: cells[1].to_string(),
            service_type: cells[2].to_string(),
            scheduled_departure,
            actual_departure,
            scheduled_arrival,
            actual_arrival,
            boardings,
            trip_date,
            delay_minutes,
            on_time: is_on_time(delay_minutes, thresholds.on_time_minutes),
            hour: scheduled_departure.hour(),
            day_of_week,
            is_weekend: day_of_week >= 5,
        });
    }

    let route_conflicts = find_route_conflicts(&records);
    for conflict in &route_conflicts {
        warn!(
            route_id = %conflict.route_id,
            names = ?conflict.route_names,
            service_types = ?conflict.service_types,
            "Route id maps to inconsistent attributes; first-seen values are used"
        );
    }

    let blank_ids = blank_counts.get("route_id").copied().unwrap_or(0);
    if blank_ids > 0 {
        warn!(
            trips = blank_ids,
            "Trips without a route_id are grouped under an empty route id"
        );
    }
    debug!(?blank_counts, "Blank cell counts");
    info!(
        records = records.len(),
        conflicts = route_conflicts.len(),
        "Trip records ingested"
    );

    Ok(TripDataset {
        records,
        columns: table.columns.clone(),
        blank_counts,
        route_conflicts,
    })
}

/// Parses a timestamp in RFC 3339 or one of the plain `YYYY-MM-DD HH:MM[:SS]` forms.
///
/// Offsets are dropped and the local wall-clock time is kept.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

fn find_route_conflicts(records: &[TripRecord]) -> Vec<RouteConflict> {
    let mut seen: BTreeMap<&str, (Vec<&str>, Vec<&str>)> = BTreeMap::new();

    for r in records {
        let (names, types) = seen.entry(r.route_id.as_str()).or_default();
        if !names.contains(&r.route_name.as_str()) {
            names.push(r.route_name.as_str());
        }
        if !types.contains(&r.service_type.as_str()) {
            types.push(r.service_type.as_str());
        }
    }

    seen.into_iter()
        .filter(|(_, (names, types))| names.len() > 1 || types.len() > 1)
        .map(|(id, (names, types))| RouteConflict {
            route_id: id.to_string(),
            route_names: names.into_iter().map(str::to_string).collect(),
            service_types: types.into_iter().map(str::to_string).collect(),
        })
        .collect()
}
