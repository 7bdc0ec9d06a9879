//! Static map context: the view the overlay opens on and the municipal
//! bike-lane layers drawn beneath the station markers.

use anyhow::{Result, bail};
use serde::Serialize;

/// Initial camera position and zoom limits for the overlay.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapView {
    /// `[longitude, latitude]`.
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub style: &'static str,
}

/// Line paint applied to a lane layer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LanePaint {
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
}

/// A remote GeoJSON source of bike-lane geometry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LaneSource {
    pub id: &'static str,
    pub url: &'static str,
    pub paint: LanePaint,
}

/// Complete static layer description a renderer needs before any traffic
/// data arrives.
#[derive(Debug, Clone, Serialize)]
pub struct MapConfig {
    pub view: MapView,
    pub lanes: Vec<LaneSource>,
}

/// The overlay opens on the Charles River between Boston and Cambridge.
pub fn map_view() -> MapView {
    MapView {
        center: [-71.09415, 42.36027],
        zoom: 12.0,
        min_zoom: 5.0,
        max_zoom: 18.0,
        style: "mapbox://styles/mapbox/streets-v12",
    }
}

/// The two municipal lane layers and the paint each city's lanes use.
pub fn lane_sources() -> Vec<LaneSource> {
    vec![
        LaneSource {
            id: "boston-lanes",
            url: "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson",
            paint: LanePaint {
                color: "#DA3E52",
                width: 3.0,
                opacity: 0.4,
            },
        },
        LaneSource {
            id: "cambridge-lanes",
            url: "https://raw.githubusercontent.com/cambridgegis/cambridgegis_data/main/Recreation/Bike_Facilities/RECREATION_BikeFacilities.geojson",
            paint: LanePaint {
                color: "#3B9C9C",
                width: 3.0,
                opacity: 0.4,
            },
        },
    ]
}

/// Bundles the view and lane sources for serialization.
pub fn map_config() -> MapConfig {
    MapConfig {
        view: map_view(),
        lanes: lane_sources(),
    }
}

/// Counts the features in a fetched GeoJSON body.
///
/// Only the collection length matters here, so the body is probed as generic
/// JSON instead of being deserialized into geometry types.
pub fn lane_feature_count(bytes: &[u8]) -> Result<usize> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;

    if json["type"].as_str() != Some("FeatureCollection") {
        bail!("lane source is not a GeoJSON FeatureCollection");
    }
    match json["features"].as_array() {
        Some(features) => Ok(features.len()),
        None => bail!("lane source has no features array"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_sources_paint() {
        let lanes = lane_sources();

        assert_eq!(lanes.len(), 2);
        assert_eq!(lanes[0].id, "boston-lanes");
        assert_eq!(lanes[0].paint.color, "#DA3E52");
        assert_eq!(lanes[1].id, "cambridge-lanes");
        assert_eq!(lanes[1].paint.color, "#3B9C9C");
        for lane in &lanes {
            assert_eq!(lane.paint.width, 3.0);
            assert_eq!(lane.paint.opacity, 0.4);
        }
    }

    #[test]
    fn test_map_view_limits() {
        let view = map_view();

        assert_eq!(view.center, [-71.09415, 42.36027]);
        assert_eq!(view.zoom, 12.0);
        assert!(view.min_zoom < view.zoom && view.zoom < view.max_zoom);
    }

    #[test]
    fn test_lane_feature_count() {
        let body = r#"{"type": "FeatureCollection", "features": [{}, {}, {}]}"#;
        assert_eq!(lane_feature_count(body.as_bytes()).unwrap(), 3);
    }

    #[test]
    fn test_lane_feature_count_rejects_non_collection() {
        let body = r#"{"type": "Feature", "geometry": null}"#;
        assert!(lane_feature_count(body.as_bytes()).is_err());
        assert!(lane_feature_count(b"[1, 2]").is_err());
    }

    #[test]
    fn test_map_config_serializes() {
        let json = serde_json::to_value(map_config()).unwrap();
        assert_eq!(json["view"]["zoom"], 12.0);
        assert_eq!(json["lanes"][0]["paint"]["color"], "#DA3E52");
    }
}
