//! Provider-neutral path and stop types.
//!
//! These are what the routing collaborator hands back before the segment
//! builder turns them into domain segments.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, TransportMode};

/// One turn-by-turn step of a raw path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStep {
    /// Human-readable instruction
    pub instruction: String,
    /// Step length in metres
    #[serde(default)]
    pub distance_m: f64,
    /// Step duration in seconds
    #[serde(default)]
    pub duration_s: f64,
}

/// A path between two points as returned by a routing provider.
///
/// Values are not validated here; the segment builder rejects malformed
/// paths (negative distance or duration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPath {
    /// Requested start point
    pub origin: Coordinate,
    /// Requested end point
    pub destination: Coordinate,
    /// Path length in metres
    pub distance_m: f64,
    /// Travel time in seconds, if the provider knows it
    #[serde(default)]
    pub duration_s: Option<f64>,
    /// Path geometry, in travel order
    #[serde(default)]
    pub geometry: Vec<Coordinate>,
    /// Turn-by-turn steps, possibly empty
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

impl RawPath {
    /// A path with no geometry or steps.
    pub fn new(
        origin: Coordinate,
        destination: Coordinate,
        distance_m: f64,
        duration_s: Option<f64>,
    ) -> Self {
        Self {
            origin,
            destination,
            distance_m,
            duration_s,
            geometry: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Returns this path with the given steps.
    pub fn with_steps(mut self, steps: Vec<RawStep>) -> Self {
        self.steps = steps;
        self
    }
}

/// A boarding point for a station-based mode (bus stop, subway station,
/// bike-share dock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitStop {
    /// Provider identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Where the stop is
    pub location: Coordinate,
    /// Mode served from this stop
    pub mode: TransportMode,
}
