//! Production routing provider backed by OpenStreetMap services.

use crate::domain::{Coordinate, TransportMode};

use super::error::ProviderError;
use super::osrm::OsrmClient;
use super::overpass::OverpassClient;
use super::types::{RawPath, TransitStop};
use super::GeoRoutingProvider;

/// Paths from OSRM, stops from Overpass.
#[derive(Debug, Clone)]
pub struct OsmRoutingProvider {
    osrm: OsrmClient,
    overpass: OverpassClient,
}

impl OsmRoutingProvider {
    pub fn new(osrm: OsrmClient, overpass: OverpassClient) -> Self {
        Self { osrm, overpass }
    }
}

impl GeoRoutingProvider for OsmRoutingProvider {
    async fn compute_path(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<RawPath, ProviderError> {
        self.osrm.route(origin, destination, mode).await
    }

    async fn nearest_stop(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
    ) -> Result<Option<TransitStop>, ProviderError> {
        self.overpass.nearest_stop(location, mode, radius_m).await
    }

    async fn nearby_stops(
        &self,
        location: Coordinate,
        mode: TransportMode,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<TransitStop>, ProviderError> {
        self.overpass
            .nearby_stops(location, mode, radius_m, limit)
            .await
    }
}
