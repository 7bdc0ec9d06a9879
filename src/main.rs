//! CLI entry point for the bikeshare traffic tool.
//!
//! Provides subcommands for computing one overlay snapshot, sweeping the
//! time-of-day window across a whole day, and exporting the static map
//! configuration with its bike-lane layers.

use anyhow::{Result, bail, ensure};
use bikeshare_traffic::fetch::{BasicClient, fetch_bytes, load_source};
use bikeshare_traffic::layers::{lane_feature_count, map_config};
use bikeshare_traffic::loader::{parse_stations, parse_trips};
use bikeshare_traffic::output::{Snapshot, SweepRecord, append_sweep_record, write_snapshot};
use bikeshare_traffic::traffic::aggregate::aggregate;
use bikeshare_traffic::traffic::scale::markers;
use bikeshare_traffic::traffic::types::{Station, Trip};
use bikeshare_traffic::traffic::window::{TimeFilter, filter_by_time};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_traffic")]
#[command(about = "Computes bike-share station traffic for a map overlay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one overlay state and write it as a JSON snapshot
    Snapshot {
        /// Station feed: file path or URL
        #[arg(short, long)]
        stations: String,

        /// Trip log CSV: file path or URL
        #[arg(short, long)]
        trips: String,

        /// Minute of day to center the window on (-1 = whole day)
        #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
        minute: i32,

        /// JSON file to write
        #[arg(short, long, default_value = "snapshot.json")]
        output: String,
    },
    /// Recompute the windowed overlay at fixed steps across the whole day
    Sweep {
        /// Station feed: file path or URL
        #[arg(short, long)]
        stations: String,

        /// Trip log CSV: file path or URL
        #[arg(short, long)]
        trips: String,

        /// Minutes between reference points
        #[arg(long, default_value_t = 30)]
        step: u32,

        /// CSV file to append one row per reference minute to
        #[arg(short, long, default_value = "sweep.csv")]
        output: String,
    },
    /// Fetch the bike-lane layers and write the static map config
    Lanes {
        /// JSON file to write
        #[arg(short, long, default_value = "map_config.json")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot {
            stations,
            trips,
            minute,
            output,
        } => {
            run_snapshot(&stations, &trips, minute, &output).await?;
        }
        Commands::Sweep {
            stations,
            trips,
            step,
            output,
        } => {
            run_sweep(&stations, &trips, step, &output).await?;
        }
        Commands::Lanes { output } => {
            run_lanes(&output).await?;
        }
    }

    Ok(())
}

/// Validates a raw slider value: -1 for "whole day", otherwise a minute of
/// day in [0, 1439].
fn parse_slider_minute(value: i32) -> Result<TimeFilter> {
    if value != -1 && !(0..=1439).contains(&value) {
        bail!("minute must be -1 (no filter) or within 0..=1439, got {value}");
    }
    Ok(TimeFilter::from_slider(value))
}

/// Loads both input feeds from files or URLs.
async fn load_inputs(stations_src: &str, trips_src: &str) -> Result<(Vec<Station>, Vec<Trip>)> {
    let stations = parse_stations(&load_source(stations_src).await?)?;
    let trips = parse_trips(&load_source(trips_src).await?)?;
    info!(
        stations = stations.len(),
        trips = trips.len(),
        "Inputs loaded"
    );
    Ok((stations, trips))
}

/// Computes one overlay state: window the trips, aggregate per station,
/// scale to markers, write the snapshot.
#[tracing::instrument(skip(stations_src, trips_src), fields(minute, output))]
async fn run_snapshot(
    stations_src: &str,
    trips_src: &str,
    minute: i32,
    output: &str,
) -> Result<()> {
    let filter = parse_slider_minute(minute)?;
    let (stations, trips) = load_inputs(stations_src, trips_src).await?;

    let windowed = filter_by_time(&trips, filter);
    let annotated = aggregate(&stations, &windowed);
    let max_total = annotated.iter().map(|s| s.total_traffic).max().unwrap_or(0);

    let snapshot = Snapshot {
        generated_at: Utc::now(),
        filter_minute: match filter {
            TimeFilter::All => None,
            TimeFilter::Minute(m) => Some(m),
        },
        trips_considered: windowed.len(),
        max_total_traffic: max_total,
        markers: markers(&annotated, filter.is_active()),
    };

    write_snapshot(output, &snapshot)?;
    info!(
        output,
        trips_considered = snapshot.trips_considered,
        max_total,
        "Snapshot written"
    );
    Ok(())
}

/// Replays the slider across the day: a full, independent recomputation at
/// every step, appending one summary row per reference minute.
#[tracing::instrument(skip(stations_src, trips_src), fields(step, output))]
async fn run_sweep(stations_src: &str, trips_src: &str, step: u32, output: &str) -> Result<()> {
    ensure!(
        (1..=1440).contains(&step),
        "step must be within 1..=1440, got {step}"
    );
    let (stations, trips) = load_inputs(stations_src, trips_src).await?;

    let mut rows = 0;
    for minute in (0..1440).step_by(step as usize) {
        let windowed = filter_by_time(&trips, TimeFilter::Minute(minute));
        let annotated = aggregate(&stations, &windowed);
        let busiest = annotated.iter().max_by_key(|s| s.total_traffic);

        let record = SweepRecord {
            minute,
            trips_in_window: windowed.len(),
            busiest_station: busiest.map(|s| s.short_name.clone()).unwrap_or_default(),
            busiest_total: busiest.map(|s| s.total_traffic).unwrap_or(0),
            total_departures: annotated.iter().map(|s| s.departures).sum(),
            total_arrivals: annotated.iter().map(|s| s.arrivals).sum(),
        };
        append_sweep_record(output, &record)?;
        rows += 1;
    }

    info!(output, rows, "Sweep complete");
    Ok(())
}

/// Fetches each lane layer, logs what it found, and writes the static map
/// configuration a renderer consumes alongside snapshots.
#[tracing::instrument(fields(output))]
async fn run_lanes(output: &str) -> Result<()> {
    let config = map_config();
    let client = BasicClient::new();

    for lane in &config.lanes {
        match fetch_bytes(&client, lane.url).await {
            Ok(bytes) => match lane_feature_count(&bytes) {
                Ok(count) => info!(layer = lane.id, features = count, "Lane layer fetched"),
                Err(e) => warn!(layer = lane.id, error = %e, "Lane layer is not usable GeoJSON"),
            },
            Err(e) => error!(layer = lane.id, error = %e, "Lane layer fetch failed"),
        }
    }

    std::fs::write(output, serde_json::to_vec_pretty(&config)?)?;
    info!(output, "Map config written");
    Ok(())
}
