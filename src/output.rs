//! Output surfaces: snapshot JSON for the renderer and sweep CSV rows.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::traffic::scale::Marker;

/// Everything the renderer needs to draw one state of the overlay.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    /// Reference minute the window was centered on; absent when unfiltered.
    pub filter_minute: Option<u32>,
    pub trips_considered: usize,
    pub max_total_traffic: u32,
    pub markers: Vec<Marker>,
}

/// One row of a day sweep: the aggregate picture at a reference minute.
#[derive(Debug, Default, Serialize)]
pub struct SweepRecord {
    pub minute: u32,
    pub trips_in_window: usize,
    pub busiest_station: String,
    pub busiest_total: u32,
    pub total_departures: u32,
    pub total_arrivals: u32,
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a snapshot as pretty JSON, replacing any previous file.
pub fn write_snapshot(path: &str, snapshot: &Snapshot) -> Result<()> {
    debug!(path, markers = snapshot.markers.len(), "Writing snapshot");
    std::fs::write(path, serde_json::to_vec_pretty(snapshot)?)?;
    Ok(())
}

/// Appends a [`SweepRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_sweep_record(path: &str, record: &SweepRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending sweep record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
