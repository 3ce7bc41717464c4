//! Overpass API client for stop lookups.
//!
//! Bus stops, subway stations and bike-share docks are all OpenStreetMap
//! nodes, so a single `around` query per mode finds candidate boarding
//! points near a location.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::{Coordinate, TransportMode};

use super::error::ProviderError;
use super::types::TransitStop;

/// Default public Overpass interpreter.
const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OverpassConfig {
    /// Create a config for the given interpreter endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// OSM tag selecting boarding points for a mode.
///
/// Modes that do not board at a stop have no tag.
fn stop_filter(mode: TransportMode) -> Option<&'static str> {
    match mode {
        TransportMode::Bus => Some(r#"["highway"="bus_stop"]"#),
        TransportMode::Subway => Some(r#"["railway"="station"]"#),
        TransportMode::SharedBike => Some(r#"["amenity"="bicycle_rental"]"#),
        TransportMode::Walking | TransportMode::Cycling | TransportMode::Driving => None,
    }
}

/// Build the Overpass QL query for stops around a point.
fn build_query(filter: &str, location: &Coordinate, radius_m: f64, timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{}];node{}(around:{:.0},{},{});out body;",
        timeout_secs,
        filter,
        radius_m,
        location.latitude(),
        location.longitude()
    )
}

/// Overpass API client.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl OverpassClient {
    /// Create a new Overpass client.
    pub fn new(config: OverpassConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Find the stop serving `mode` nearest to `location` within `radius_m`.
    pub async fn nearest_stop(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
    ) -> Result<Option<TransitStop>, ProviderError> {
        let stops = self.nearby_stops(location, mode, radius_m, 1).await?;
        Ok(stops.into_iter().next())
    }

    /// Stops serving `mode` within `radius_m` of `location`, nearest first.
    pub async fn nearby_stops(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<TransitStop>, ProviderError> {
        let Some(filter) = stop_filter(mode) else {
            return Ok(Vec::new());
        };

        let query = build_query(filter, &location, radius_m, self.timeout_secs);

        let response = self
            .http
            .post(&self.base_url)
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: OverpassResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let mut stops = by_distance(parsed.elements, &location, mode);
        stops.truncate(limit);
        Ok(stops)
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: Tags,
}

#[derive(Debug, Default, Deserialize)]
struct Tags {
    name: Option<String>,
}

/// Convert elements to stops, closest to `location` first.
///
/// Elements without a valid position are ignored.
fn by_distance(elements: Vec<Element>, location: &Coordinate, mode: TransportMode) -> Vec<TransitStop> {
    let mut ranked: Vec<(f64, TransitStop)> = elements
        .into_iter()
        .filter_map(|el| {
            let position = Coordinate::new(el.lat?, el.lon?).ok()?;
            let name = el
                .tags
                .name
                .unwrap_or_else(|| format!("{} stop {}", mode.as_str(), el.id));
            let stop = TransitStop {
                id: el.id.to_string(),
                name,
                location: position,
                mode,
            };
            Some((location.distance_m(&position), stop))
        })
        .collect();

    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, stop)| stop).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn query_format() {
        let q = build_query(
            stop_filter(TransportMode::Bus).unwrap(),
            &coord(39.9, 116.4),
            1000.0,
            10,
        );
        assert_eq!(
            q,
            r#"[out:json][timeout:10];node["highway"="bus_stop"](around:1000,39.9,116.4);out body;"#
        );
    }

    #[test]
    fn only_station_modes_have_filters() {
        for mode in TransportMode::ALL {
            assert_eq!(stop_filter(mode).is_some(), mode.is_station_based(), "{mode}");
        }
    }

    #[test]
    fn picks_nearest_element() {
        let json = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 39.91, "lon": 116.41, "tags": {"name": "Far"}},
                {"type": "node", "id": 2, "lat": 39.9005, "lon": 116.4005, "tags": {"name": "Near"}},
                {"type": "node", "id": 3, "lat": 39.905, "lon": 116.405}
            ]
        }"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        let stops = by_distance(response.elements, &coord(39.9, 116.4), TransportMode::Bus);
        let ids: Vec<_> = stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "1"]);

        let stop = &stops[0];
        assert_eq!(stop.id, "2");
        assert_eq!(stop.name, "Near");
        assert_eq!(stop.mode, TransportMode::Bus);
        assert_eq!(stop.location, coord(39.9005, 116.4005));
    }

    #[test]
    fn unnamed_stop_gets_placeholder() {
        let json = r#"{"elements": [{"type": "node", "id": 42, "lat": 1.0, "lon": 1.0}]}"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        let stops = by_distance(response.elements, &coord(1.0, 1.0), TransportMode::Subway);
        assert_eq!(stops[0].name, "subway stop 42");
    }

    #[test]
    fn empty_or_unpositioned_elements_give_no_stops() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{"elements": [{"type": "way", "id": 7, "tags": {"name": "Depot"}}]}"#,
        )
        .unwrap();
        assert!(by_distance(response.elements, &coord(0.0, 0.0), TransportMode::Bus).is_empty());

        let response: OverpassResponse = serde_json::from_str(r#"{"elements": []}"#).unwrap();
        assert!(by_distance(response.elements, &coord(0.0, 0.0), TransportMode::Bus).is_empty());
    }

    #[tokio::test]
    async fn non_station_mode_short_circuits() {
        let client = OverpassClient::new(OverpassConfig::new("http://127.0.0.1:9")).unwrap();
        let result = client
            .nearest_stop(coord(0.0, 0.0), TransportMode::Walking, 500.0)
            .await
            .unwrap();
        assert!(result.is_none());

        let nearby = client
            .nearby_stops(coord(0.0, 0.0), TransportMode::Driving, 500.0, 10)
            .await
            .unwrap();
        assert!(nearby.is_empty());
    }
}
