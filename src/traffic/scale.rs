use serde::Serialize;

use crate::traffic::types::Station;

/// Square-root scale mapping a station's total traffic onto a circle radius.
///
/// The output range depends on whether a time window is active:
///
/// | Window  | Range    |
/// |---------|----------|
/// | off     | [0, 25]  |
/// | on      | [3, 50]  |
///
/// The wider filtered range keeps thinned-out traffic visible while small
/// unfiltered circles stay out of each other's way.
#[derive(Debug, Clone, Copy)]
pub struct RadiusScale {
    max_total: u32,
    r_min: f64,
    r_max: f64,
}

/// Builds the scale for a traffic domain of `[0, max_total]`.
pub fn radius_scale(max_total: u32, filtered: bool) -> RadiusScale {
    let (r_min, r_max) = if filtered { (3.0, 50.0) } else { (0.0, 25.0) };
    RadiusScale {
        max_total,
        r_min,
        r_max,
    }
}

impl RadiusScale {
    /// Radius for a total-traffic value.
    ///
    /// A zero-traffic domain pins every station to the range minimum.
    pub fn radius(&self, total: u32) -> f64 {
        if self.max_total == 0 {
            return self.r_min;
        }
        let proportion = total as f64 / self.max_total as f64;
        self.r_min + (self.r_max - self.r_min) * proportion.sqrt()
    }
}

/// Tooltip line shown when hovering a station marker.
pub fn tooltip(station: &Station) -> String {
    format!(
        "{} trips ({} departures, {} arrivals)",
        station.total_traffic, station.departures, station.arrivals
    )
}

/// Renderer-ready description of one station marker.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub short_name: String,
    pub lon: f64,
    pub lat: f64,
    pub departures: u32,
    pub arrivals: u32,
    pub total_traffic: u32,
    pub radius: f64,
    pub tooltip: String,
}

/// Maps annotated stations to markers, sharing one scale across the set.
pub fn markers(stations: &[Station], filtered: bool) -> Vec<Marker> {
    let max_total = stations.iter().map(|s| s.total_traffic).max().unwrap_or(0);
    let scale = radius_scale(max_total, filtered);

    stations
        .iter()
        .map(|s| Marker {
            short_name: s.short_name.clone(),
            lon: s.lon,
            lat: s.lat,
            departures: s.departures,
            arrivals: s.arrivals,
            total_traffic: s.total_traffic,
            radius: scale.radius(s.total_traffic),
            tooltip: tooltip(s),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated(short_name: &str, departures: u32, arrivals: u32) -> Station {
        Station {
            short_name: short_name.to_string(),
            lon: -71.09,
            lat: 42.36,
            arrivals,
            departures,
            total_traffic: departures + arrivals,
        }
    }

    #[test]
    fn test_radius_range_endpoints() {
        let unfiltered = radius_scale(100, false);
        assert_eq!(unfiltered.radius(0), 0.0);
        assert_eq!(unfiltered.radius(100), 25.0);

        let filtered = radius_scale(100, true);
        assert_eq!(filtered.radius(0), 3.0);
        assert_eq!(filtered.radius(100), 50.0);
    }

    #[test]
    fn test_radius_is_sqrt_not_linear() {
        let scale = radius_scale(100, false);
        // A quarter of the max traffic draws half the max radius.
        assert!((scale.radius(25) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_domain_pins_to_minimum() {
        assert_eq!(radius_scale(0, false).radius(0), 0.0);
        assert_eq!(radius_scale(0, true).radius(0), 3.0);
    }

    #[test]
    fn test_tooltip_format() {
        let s = annotated("A32000", 2, 1);
        assert_eq!(tooltip(&s), "3 trips (2 departures, 1 arrivals)");
    }

    #[test]
    fn test_markers_share_one_scale() {
        let stations = vec![annotated("A", 2, 1), annotated("B", 0, 1), annotated("C", 0, 0)];
        let out = markers(&stations, true);

        assert_eq!(out.len(), 3);
        // Max total is 3, so A hits the top of the filtered range.
        assert_eq!(out[0].radius, 50.0);
        assert!((out[1].radius - (3.0 + 47.0 * (1.0f64 / 3.0).sqrt())).abs() < 1e-9);
        assert_eq!(out[2].radius, 3.0);
        assert_eq!(out[1].tooltip, "1 trips (0 departures, 1 arrivals)");
    }

    #[test]
    fn test_markers_empty_station_set() {
        assert!(markers(&[], false).is_empty());
    }
}
