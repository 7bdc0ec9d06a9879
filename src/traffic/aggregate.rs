use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::traffic::types::{Station, Trip};

/// Annotates every station with arrival, departure, and total counts over
/// `trips`.
///
/// Returns a fresh copy of `stations`, same order, with the three derived
/// fields replaced (previous annotations are discarded, not accumulated).
/// A trip referencing a station id the set does not contain is counted but
/// never matches a station, so it contributes nothing.
pub fn aggregate(stations: &[Station], trips: &[Trip]) -> Vec<Station> {
    let mut departures: HashMap<&str, u32> = HashMap::new();
    let mut arrivals: HashMap<&str, u32> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    let known: HashSet<&str> = stations.iter().map(|s| s.short_name.as_str()).collect();
    let orphan_trips = trips
        .iter()
        .filter(|t| {
            !known.contains(t.start_station_id.as_str())
                || !known.contains(t.end_station_id.as_str())
        })
        .count();
    if orphan_trips > 0 {
        debug!(orphan_trips, "Trips reference station ids missing from the feed");
    }

    stations
        .iter()
        .map(|station| {
            let dep = departures
                .get(station.short_name.as_str())
                .copied()
                .unwrap_or(0);
            let arr = arrivals
                .get(station.short_name.as_str())
                .copied()
                .unwrap_or(0);
            Station {
                arrivals: arr,
                departures: dep,
                total_traffic: arr + dep,
                ..station.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::types::parse_trip_time;

    fn station(short_name: &str) -> Station {
        Station {
            short_name: short_name.to_string(),
            lon: -71.09,
            lat: 42.36,
            arrivals: 0,
            departures: 0,
            total_traffic: 0,
        }
    }

    fn trip(start: &str, end: &str) -> Trip {
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: parse_trip_time("2024-03-05 08:10:00").unwrap(),
            ended_at: parse_trip_time("2024-03-05 08:25:00").unwrap(),
        }
    }

    #[test]
    fn test_empty_trips_zeroes_every_station() {
        let stations = vec![station("A"), station("B")];
        let annotated = aggregate(&stations, &[]);

        assert_eq!(annotated.len(), 2);
        for s in &annotated {
            assert_eq!(s.arrivals, 0);
            assert_eq!(s.departures, 0);
            assert_eq!(s.total_traffic, 0);
        }
    }

    #[test]
    fn test_counts_per_station() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B"), trip("A", "A")];

        let annotated = aggregate(&stations, &trips);

        assert_eq!(annotated[0].departures, 2);
        assert_eq!(annotated[0].arrivals, 1);
        assert_eq!(annotated[0].total_traffic, 3);
        assert_eq!(annotated[1].departures, 0);
        assert_eq!(annotated[1].arrivals, 1);
        assert_eq!(annotated[1].total_traffic, 1);
    }

    #[test]
    fn test_total_is_arrivals_plus_departures() {
        let stations = vec![station("A"), station("B"), station("C")];
        let trips = vec![trip("A", "B"), trip("B", "C"), trip("C", "A"), trip("B", "B")];

        for s in aggregate(&stations, &trips) {
            assert_eq!(s.total_traffic, s.arrivals + s.departures);
        }
    }

    #[test]
    fn test_unknown_station_ids_contribute_nothing() {
        let stations = vec![station("A")];
        let trips = vec![trip("Z", "A"), trip("Z", "Z")];

        let annotated = aggregate(&stations, &trips);

        assert_eq!(annotated[0].departures, 0);
        assert_eq!(annotated[0].arrivals, 1);
        assert_eq!(annotated[0].total_traffic, 1);
    }

    #[test]
    fn test_repeated_calls_do_not_accumulate() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B")];

        let first = aggregate(&stations, &trips);
        let second = aggregate(&first, &trips);

        assert_eq!(first, second);
        // Inputs are untouched.
        assert_eq!(stations[0].total_traffic, 0);
    }

    #[test]
    fn test_output_preserves_input_order() {
        let stations = vec![station("C"), station("A"), station("B")];
        let annotated = aggregate(&stations, &[]);

        let names: Vec<_> = annotated.iter().map(|s| s.short_name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }
}
