//! Caching layer for routing provider responses.
//!
//! Paths and stop lookups change slowly, so repeated requests between the
//! same places can skip the network. Coordinates are quantised to a grid
//! (4 decimal places, roughly 11 m) to bound cache cardinality; a cache hit
//! is re-stamped with the exact requested endpoints so routes still chain.
//!
//! Only successful responses are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, TransportMode};
use crate::providers::{GeoRoutingProvider, ProviderError, RawPath, TransitStop};

/// Quantised coordinate.
type GridPoint = (i64, i64);

/// Cache key for paths: (origin, destination, mode).
type PathKey = (GridPoint, GridPoint, TransportMode);

/// Cache key for stops: (location, mode, radius in whole metres).
type StopKey = (GridPoint, TransportMode, u64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,

    /// Decimal places kept when quantising coordinates.
    pub grid_digits: i32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
            grid_digits: 4,
        }
    }
}

/// Routing provider with caching.
///
/// Wraps any [`GeoRoutingProvider`] and caches its answers.
pub struct CachedGeoProvider<G> {
    inner: G,
    paths: MokaCache<PathKey, Arc<RawPath>>,
    stops: MokaCache<StopKey, Option<TransitStop>>,
    grid_digits: i32,
}

impl<G: GeoRoutingProvider> CachedGeoProvider<G> {
    /// Create a new cached provider.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let paths = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let stops = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            paths,
            stops,
            grid_digits: config.grid_digits,
        }
    }

    fn grid(&self, c: &Coordinate) -> GridPoint {
        c.quantized(self.grid_digits)
    }

    /// Number of cached entries (paths plus stop lookups).
    ///
    /// Moka counts lazily; call [`run_pending_tasks`](Self::run_pending_tasks)
    /// first for an exact figure.
    pub fn entry_count(&self) -> u64 {
        self.paths.entry_count() + self.stops.entry_count()
    }

    /// Flush moka's pending housekeeping.
    pub async fn run_pending_tasks(&self) {
        self.paths.run_pending_tasks().await;
        self.stops.run_pending_tasks().await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.paths.invalidate_all();
        self.stops.invalidate_all();
    }
}

impl<G: GeoRoutingProvider> GeoRoutingProvider for CachedGeoProvider<G> {
    async fn compute_path(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<RawPath, ProviderError> {
        let key = (self.grid(&origin), self.grid(&destination), mode);

        if let Some(cached) = self.paths.get(&key).await {
            let mut path = RawPath::clone(&cached);
            path.origin = origin;
            path.destination = destination;
            return Ok(path);
        }

        let path = self.inner.compute_path(origin, destination, mode).await?;
        self.paths.insert(key, Arc::new(path.clone())).await;
        Ok(path)
    }

    async fn nearest_stop(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
    ) -> Result<Option<TransitStop>, ProviderError> {
        let key = (self.grid(&location), mode, radius_m.max(0.0).round() as u64);

        if let Some(cached) = self.stops.get(&key).await {
            return Ok(cached);
        }

        let stop = self.inner.nearest_stop(location, mode, radius_m).await?;
        self.stops.insert(key, stop.clone()).await;
        Ok(stop)
    }

    /// Not cached: listings are browsed interactively, not re-planned.
    async fn nearby_stops(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<TransitStop>, ProviderError> {
        self.inner
            .nearby_stops(location, mode, radius_m, limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockGeoProvider;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 10_000);
        assert_eq!(config.grid_digits, 4);
    }

    #[tokio::test]
    async fn repeated_path_is_served_from_cache() {
        let mock = MockGeoProvider::new().with_path(TransportMode::Bus, 4200.0, Some(900.0));
        let cached = CachedGeoProvider::new(mock.clone(), &CacheConfig::default());

        let a = coord(39.90001, 116.40001);
        let b = coord(39.95, 116.45);
        let first = cached.compute_path(a, b, TransportMode::Bus).await.unwrap();

        // Same grid cell, slightly different point
        let a2 = coord(39.90002, 116.40002);
        let second = cached.compute_path(a2, b, TransportMode::Bus).await.unwrap();

        assert_eq!(mock.path_calls(), 1);
        assert_eq!(first.distance_m, second.distance_m);
        assert_eq!(second.origin, a2);
        assert_eq!(second.destination, b);
    }

    #[tokio::test]
    async fn modes_are_cached_separately() {
        let mock = MockGeoProvider::new();
        let cached = CachedGeoProvider::new(mock.clone(), &CacheConfig::default());
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 0.01);

        cached.compute_path(a, b, TransportMode::Walking).await.unwrap();
        cached.compute_path(a, b, TransportMode::Cycling).await.unwrap();
        assert_eq!(mock.path_calls(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mock = MockGeoProvider::new().fail_mode(TransportMode::Subway);
        let cached = CachedGeoProvider::new(mock.clone(), &CacheConfig::default());
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 0.01);

        assert!(cached.compute_path(a, b, TransportMode::Subway).await.is_err());
        assert!(cached.compute_path(a, b, TransportMode::Subway).await.is_err());
        assert_eq!(mock.path_calls(), 2);
    }

    #[tokio::test]
    async fn stop_lookups_are_cached_including_misses() {
        let mock = MockGeoProvider::new();
        let cached = CachedGeoProvider::new(mock.clone(), &CacheConfig::default());
        let here = coord(0.0, 0.0);

        assert!(
            cached
                .nearest_stop(here, TransportMode::Bus, 500.0)
                .await
                .unwrap()
                .is_none()
        );
        cached
            .nearest_stop(here, TransportMode::Bus, 500.0)
            .await
            .unwrap();
        assert_eq!(mock.stop_calls(), 1);

        cached.run_pending_tasks().await;
        assert_eq!(cached.entry_count(), 1);

        cached.invalidate_all();
        cached
            .nearest_stop(here, TransportMode::Bus, 500.0)
            .await
            .unwrap();
        assert_eq!(mock.stop_calls(), 2);
    }

    #[tokio::test]
    async fn nearby_listing_passes_through() {
        let stop = TransitStop {
            id: "dock".into(),
            name: "Dock".into(),
            location: coord(0.0, 0.001),
            mode: TransportMode::SharedBike,
        };
        let mock = MockGeoProvider::new().with_stop(stop.clone());
        let cached = CachedGeoProvider::new(mock.clone(), &CacheConfig::default());
        let here = coord(0.0, 0.0);

        for _ in 0..2 {
            let stops = cached
                .nearby_stops(here, TransportMode::SharedBike, 500.0, 5)
                .await
                .unwrap();
            assert_eq!(stops, vec![stop.clone()]);
        }
        assert_eq!(mock.stop_calls(), 2);
    }
}
