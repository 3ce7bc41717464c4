//! Deterministic providers for tests and offline runs.
//!
//! `MockGeoProvider` synthesises straight-line paths for any mode unless
//! told otherwise, serves stops from a fixed list, and can be made to fail
//! or stall per mode. Weather and traffic doubles return a fixed snapshot
//! or a fixed error.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::domain::{Coordinate, TrafficSnapshot, TransportMode, WeatherSnapshot};

use super::error::ProviderError;
use super::types::{RawPath, RawStep, TransitStop};
use super::{GeoRoutingProvider, TrafficProvider, WeatherProvider};

/// Road distance is longer than the crow flies.
const DETOUR_FACTOR: f64 = 1.2;

/// A fixed path shape returned for every request in one mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathTemplate {
    pub mode: TransportMode,
    pub distance_m: f64,
    #[serde(default)]
    pub duration_s: Option<f64>,
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

/// On-disk fixture format for [`MockGeoProvider::from_json_file`].
#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    paths: Vec<PathTemplate>,
    #[serde(default)]
    stops: Vec<TransitStop>,
    #[serde(default)]
    unavailable: Vec<TransportMode>,
}

/// Routing double.
#[derive(Debug, Clone, Default)]
pub struct MockGeoProvider {
    paths: HashMap<TransportMode, PathTemplate>,
    stops: Vec<TransitStop>,
    unavailable: HashSet<TransportMode>,
    broken: HashSet<TransportMode>,
    delays: HashMap<TransportMode, Duration>,
    path_calls: Arc<AtomicUsize>,
    stop_calls: Arc<AtomicUsize>,
}

impl MockGeoProvider {
    /// A provider that routes every mode in a straight line and knows no stops.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load paths, stops and unavailable modes from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::NotConfigured(format!("failed to read {}: {e}", path.display()))
        })?;

        let fixture: Fixture = serde_json::from_str(&json).map_err(|e| ProviderError::Json {
            message: format!("failed to parse {}: {e}", path.display()),
            body: None,
        })?;

        let mut provider = Self::new();
        for template in fixture.paths {
            provider.paths.insert(template.mode, template);
        }
        provider.stops = fixture.stops;
        provider.unavailable = fixture.unavailable.into_iter().collect();
        Ok(provider)
    }

    /// Serve a fixed distance and duration for every path in `mode`.
    ///
    /// Walking templates also apply to access and egress walks.
    pub fn with_path(mut self, mode: TransportMode, distance_m: f64, duration_s: Option<f64>) -> Self {
        self.paths.insert(
            mode,
            PathTemplate {
                mode,
                distance_m,
                duration_s,
                steps: Vec::new(),
            },
        );
        self
    }

    /// Add a stop.
    pub fn with_stop(mut self, stop: TransitStop) -> Self {
        self.stops.push(stop);
        self
    }

    /// Report no route for `mode`.
    pub fn fail_mode(mut self, mode: TransportMode) -> Self {
        self.unavailable.insert(mode);
        self
    }

    /// Fail every request for `mode` with a server error.
    pub fn break_mode(mut self, mode: TransportMode) -> Self {
        self.broken.insert(mode);
        self
    }

    /// Sleep before answering path requests for `mode`.
    pub fn delay_mode(mut self, mode: TransportMode, delay: Duration) -> Self {
        self.delays.insert(mode, delay);
        self
    }

    /// Number of `compute_path` calls so far.
    pub fn path_calls(&self) -> usize {
        self.path_calls.load(Ordering::SeqCst)
    }

    /// Stops serving `mode` within `radius_m`, nearest first.
    fn in_range(&self, location: Coordinate, mode: TransportMode, radius_m: f64) -> Vec<TransitStop> {
        let mut ranked: Vec<_> = self
            .stops
            .iter()
            .filter(|s| s.mode == mode)
            .map(|s| (location.distance_m(&s.location), s))
            .filter(|(d, _)| *d <= radius_m)
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, s)| s.clone()).collect()
    }

    /// Number of stop lookups so far.
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

impl GeoRoutingProvider for MockGeoProvider {
    async fn compute_path(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<RawPath, ProviderError> {
        self.path_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&mode) {
            tokio::time::sleep(*delay).await;
        }

        if self.broken.contains(&mode) {
            return Err(ProviderError::ApiError {
                status: 503,
                message: format!("mock {mode} routing is down"),
            });
        }
        if self.unavailable.contains(&mode) {
            return Err(ProviderError::unavailable(mode, "mock: no route"));
        }

        let path = match self.paths.get(&mode) {
            Some(template) => RawPath::new(origin, destination, template.distance_m, template.duration_s)
                .with_steps(template.steps.clone()),
            None => RawPath::new(
                origin,
                destination,
                origin.distance_m(&destination) * DETOUR_FACTOR,
                None,
            ),
        };
        Ok(path)
    }

    async fn nearest_stop(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
    ) -> Result<Option<TransitStop>, ProviderError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.in_range(location, mode, radius_m).into_iter().next())
    }

    async fn nearby_stops(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<TransitStop>, ProviderError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        let mut stops = self.in_range(location, mode, radius_m);
        stops.truncate(limit);
        Ok(stops)
    }
}

/// Weather double.
#[derive(Debug, Clone)]
pub struct MockWeatherProvider {
    snapshot: Option<WeatherSnapshot>,
    calls: Arc<AtomicUsize>,
}

impl MockWeatherProvider {
    /// Return this snapshot on every call.
    pub fn with_snapshot(snapshot: WeatherSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            calls: Arc::default(),
        }
    }

    /// Mild, dry, suitable for walking.
    pub fn fair() -> Self {
        Self::conditions(18.4, false, true)
    }

    /// Raining and unsuitable for walking or cycling.
    pub fn stormy() -> Self {
        Self::conditions(9.0, true, false)
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self {
            snapshot: None,
            calls: Arc::default(),
        }
    }

    fn conditions(temperature_c: f64, precipitation: bool, suitable: bool) -> Self {
        match WeatherSnapshot::new(temperature_c, precipitation, suitable, Utc::now()) {
            Ok(snapshot) => Self::with_snapshot(snapshot),
            Err(_) => Self::failing(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockWeatherProvider {
    fn default() -> Self {
        Self::fair()
    }
}

impl WeatherProvider for MockWeatherProvider {
    async fn fetch_weather(&self, _location: Coordinate) -> Result<WeatherSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone().ok_or_else(|| ProviderError::ApiError {
            status: 503,
            message: "mock weather unavailable".to_string(),
        })
    }
}

/// Traffic double.
#[derive(Debug, Clone)]
pub struct MockTrafficProvider {
    snapshot: Option<TrafficSnapshot>,
    calls: Arc<AtomicUsize>,
}

impl MockTrafficProvider {
    /// Return a snapshot with this congestion index on every call.
    pub fn with_congestion(congestion_index: f64) -> Self {
        Self {
            snapshot: TrafficSnapshot::new(congestion_index, 30.0, Utc::now()).ok(),
            calls: Arc::default(),
        }
    }

    /// Congestion index 1.0.
    pub fn free_flow() -> Self {
        Self::with_congestion(1.0)
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self {
            snapshot: None,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTrafficProvider {
    fn default() -> Self {
        Self::free_flow()
    }
}

impl TrafficProvider for MockTrafficProvider {
    async fn fetch_traffic(&self, _region: Coordinate) -> Result<TrafficSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone().ok_or_else(|| ProviderError::ApiError {
            status: 503,
            message: "mock traffic unavailable".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn stop(id: &str, mode: TransportMode, lat: f64, lon: f64) -> TransitStop {
        TransitStop {
            id: id.into(),
            name: id.into(),
            location: coord(lat, lon),
            mode,
        }
    }

    #[tokio::test]
    async fn straight_line_paths_by_default() {
        let geo = MockGeoProvider::new();
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 0.01);

        let path = geo.compute_path(a, b, TransportMode::Walking).await.unwrap();
        assert_eq!(path.origin, a);
        assert_eq!(path.destination, b);
        assert!((path.distance_m - a.distance_m(&b) * 1.2).abs() < 1e-9);
        assert_eq!(path.duration_s, None);
        assert_eq!(geo.path_calls(), 1);
    }

    #[tokio::test]
    async fn template_and_failures() {
        let geo = MockGeoProvider::new()
            .with_path(TransportMode::Bus, 4200.0, Some(900.0))
            .fail_mode(TransportMode::Subway)
            .break_mode(TransportMode::Driving);
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 0.05);

        let bus = geo.compute_path(a, b, TransportMode::Bus).await.unwrap();
        assert_eq!(bus.distance_m, 4200.0);
        assert_eq!(bus.duration_s, Some(900.0));

        let subway = geo.compute_path(a, b, TransportMode::Subway).await.unwrap_err();
        assert!(subway.is_route_unavailable());

        let driving = geo.compute_path(a, b, TransportMode::Driving).await.unwrap_err();
        assert!(!driving.is_route_unavailable());
    }

    #[tokio::test]
    async fn nearest_stop_respects_mode_and_radius() {
        let geo = MockGeoProvider::new()
            .with_stop(stop("near-bus", TransportMode::Bus, 0.0, 0.002))
            .with_stop(stop("far-bus", TransportMode::Bus, 0.0, 0.02))
            .with_stop(stop("subway", TransportMode::Subway, 0.0, 0.001));
        let here = coord(0.0, 0.0);

        let found = geo.nearest_stop(here, TransportMode::Bus, 1000.0).await.unwrap();
        assert_eq!(found.unwrap().id, "near-bus");

        // ~222 m away, outside a 100 m radius
        let none = geo.nearest_stop(here, TransportMode::Bus, 100.0).await.unwrap();
        assert!(none.is_none());

        let bikes = geo
            .nearest_stop(here, TransportMode::SharedBike, 1000.0)
            .await
            .unwrap();
        assert!(bikes.is_none());
        assert_eq!(geo.stop_calls(), 3);
    }

    #[tokio::test]
    async fn nearby_stops_are_sorted_and_limited() {
        let geo = MockGeoProvider::new()
            .with_stop(stop("far", TransportMode::Bus, 0.0, 0.006))
            .with_stop(stop("near", TransportMode::Bus, 0.0, 0.001))
            .with_stop(stop("mid", TransportMode::Bus, 0.0, 0.003))
            .with_stop(stop("out", TransportMode::Bus, 0.0, 0.05))
            .with_stop(stop("dock", TransportMode::SharedBike, 0.0, 0.001));
        let here = coord(0.0, 0.0);

        let all = geo
            .nearby_stops(here, TransportMode::Bus, 1000.0, 10)
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["near", "mid", "far"]);

        let two = geo
            .nearby_stops(here, TransportMode::Bus, 1000.0, 2)
            .await
            .unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].id, "near");
    }

    #[tokio::test]
    async fn clones_share_counters() {
        let geo = MockGeoProvider::new();
        let clone = geo.clone();
        clone
            .compute_path(coord(0.0, 0.0), coord(0.0, 0.01), TransportMode::Walking)
            .await
            .unwrap();
        assert_eq!(geo.path_calls(), 1);
    }

    #[tokio::test]
    async fn weather_and_traffic_doubles() {
        let here = coord(0.0, 0.0);

        let fair = MockWeatherProvider::fair().fetch_weather(here).await.unwrap();
        assert!(fair.outdoor_suitable());

        let storm = MockWeatherProvider::stormy().fetch_weather(here).await.unwrap();
        assert!(storm.precipitation());
        assert!(!storm.outdoor_suitable());

        let failing = MockWeatherProvider::failing();
        assert!(failing.fetch_weather(here).await.is_err());
        assert_eq!(failing.calls(), 1);

        let traffic = MockTrafficProvider::with_congestion(2.0)
            .fetch_traffic(here)
            .await
            .unwrap();
        assert_eq!(traffic.congestion_index(), 2.0);
        assert!(MockTrafficProvider::failing().fetch_traffic(here).await.is_err());
    }

    #[tokio::test]
    async fn load_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "paths": [{{"mode": "bus", "distance_m": 5000.0, "duration_s": 1200.0,
                            "steps": [{{"instruction": "Ride line 1"}}]}}],
                "stops": [{{"id": "s1", "name": "Main St", "location": {{"lat": 0.0, "lon": 0.001}},
                            "mode": "bus"}}],
                "unavailable": ["subway"]
            }}"#
        )
        .unwrap();

        let geo = MockGeoProvider::from_json_file(file.path()).unwrap();
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 0.05);

        let bus = geo.compute_path(a, b, TransportMode::Bus).await.unwrap();
        assert_eq!(bus.distance_m, 5000.0);
        assert_eq!(bus.steps[0].instruction, "Ride line 1");

        assert!(geo.compute_path(a, b, TransportMode::Subway).await.is_err());

        let stop = geo.nearest_stop(a, TransportMode::Bus, 500.0).await.unwrap();
        assert_eq!(stop.unwrap().name, "Main St");
    }

    #[test]
    fn missing_fixture_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MockGeoProvider::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
