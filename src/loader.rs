//! Parsers for the two input feeds: station JSON and the trip-log CSV.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::traffic::types::{Station, Trip};

#[derive(Deserialize)]
struct StationFeed {
    data: StationFeedData,
}

#[derive(Deserialize)]
struct StationFeedData {
    stations: Vec<Station>,
}

/// Decodes the station feed, a JSON document of shape
/// `{"data": {"stations": [...]}}`. Fields beyond the ones the pipeline
/// needs are ignored.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let feed: StationFeed =
        serde_json::from_slice(bytes).context("station feed is not valid station JSON")?;
    Ok(feed.data.stations)
}

/// Decodes the trip log, a headered CSV with one row per rental.
///
/// # Errors
///
/// Fails fast on a missing column or an unparseable timestamp, naming the
/// offending row, rather than letting a bad record land in a wrong bucket.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut trips = Vec::new();

    for (i, result) in reader.deserialize().enumerate() {
        // Line numbers are 1-based and the header occupies the first line.
        let trip: Trip = result.with_context(|| format!("trip log line {}", i + 2))?;
        trips.push(trip);
    }

    Ok(trips)
}
