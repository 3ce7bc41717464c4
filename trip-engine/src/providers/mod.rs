//! External collaborators: routing, stop lookup, weather and traffic.
//!
//! The planner only sees the traits defined here. Production adapters talk
//! to public OpenStreetMap-based services and Open-Meteo; `mock` holds
//! deterministic doubles for tests and offline runs.
//!
//! Trait methods return `Send` futures so planners built over them can be
//! driven from a multi-threaded runtime (e.g. inside an axum handler).

mod error;
pub mod mock;
mod open_meteo;
mod osm;
mod osrm;
mod overpass;
mod traffic;
mod types;

use std::future::Future;

use crate::domain::{Coordinate, TrafficSnapshot, TransportMode, WeatherSnapshot};

pub use error::ProviderError;
pub use open_meteo::{OpenMeteoClient, OpenMeteoConfig, SuitabilityThresholds};
pub use osm::OsmRoutingProvider;
pub use osrm::{OsrmClient, OsrmConfig};
pub use overpass::{OverpassClient, OverpassConfig};
pub use traffic::{RushHourConfig, RushHourTrafficProvider};
pub use types::{RawPath, RawStep, TransitStop};

/// Computes paths and finds boarding points.
pub trait GeoRoutingProvider: Send + Sync {
    /// Compute a path between two points restricted to one mode.
    ///
    /// Fails with [`ProviderError::RouteUnavailable`] when no path exists
    /// for that mode.
    fn compute_path(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> impl Future<Output = Result<RawPath, ProviderError>> + Send;

    /// Find the stop serving `mode` nearest to `location`, within `radius_m`.
    ///
    /// Returns `Ok(None)` when nothing is in range.
    fn nearest_stop(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
    ) -> impl Future<Output = Result<Option<TransitStop>, ProviderError>> + Send;

    /// Up to `limit` stops serving `mode` within `radius_m`, nearest first.
    fn nearby_stops(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<TransitStop>, ProviderError>> + Send;
}

/// Supplies current weather.
pub trait WeatherProvider: Send + Sync {
    fn fetch_weather(
        &self,
        location: Coordinate,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send;
}

/// Supplies current road traffic.
pub trait TrafficProvider: Send + Sync {
    fn fetch_traffic(
        &self,
        region: Coordinate,
    ) -> impl Future<Output = Result<TrafficSnapshot, ProviderError>> + Send;
}
