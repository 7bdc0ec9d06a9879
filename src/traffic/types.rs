//! Data types shared by the traffic pipeline.

use anyhow::bail;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer};

/// A bike dock location from the station feed.
///
/// The three traffic fields are derived: zero on load, replaced wholesale
/// by every aggregation pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    /// Unique key; the upstream feed calls the dock's short code `short_name`.
    pub short_name: String,
    pub lon: f64,
    pub lat: f64,

    #[serde(default)]
    pub arrivals: u32,
    #[serde(default)]
    pub departures: u32,
    #[serde(default)]
    pub total_traffic: u32,
}

/// One rental event from the trip log.
///
/// Station references are foreign keys into the station set and may point at
/// docks the feed does not list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    #[serde(deserialize_with = "trip_time")]
    pub started_at: NaiveDateTime,
    #[serde(deserialize_with = "trip_time")]
    pub ended_at: NaiveDateTime,
}

impl Trip {
    /// Minute of day the trip began.
    pub fn start_minute(&self) -> u32 {
        minutes_since_midnight(self.started_at)
    }

    /// Minute of day the trip ended.
    pub fn end_minute(&self) -> u32 {
        minutes_since_midnight(self.ended_at)
    }
}

/// `hour * 60 + minute`, ignoring seconds and date.
pub fn minutes_since_midnight(t: NaiveDateTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Timestamp formats seen in published trip logs. The space-separated form
/// is what the monthly CSV exports use; the `T` form shows up in API dumps.
const TRIP_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub(crate) fn parse_trip_time(raw: &str) -> anyhow::Result<NaiveDateTime> {
    for format in TRIP_TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(t);
        }
    }
    bail!("unparseable trip timestamp '{raw}'")
}

fn trip_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_trip_time(&raw).map_err(serde::de::Error::custom)
}
