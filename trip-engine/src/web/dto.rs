//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Coordinate, DomainError, PreferenceSet, RouteSegment, TrafficSnapshot, TransportMode,
    WeatherSnapshot,
};
use crate::planner::{Conditions, PlanResult, RankedRoute, SkippedMode};
use crate::providers::TransitStop;

/// Request to recommend routes.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Start point, `{"lat": .., "lon": ..}`
    pub origin: Coordinate,

    /// End point
    pub destination: Coordinate,

    /// Traveler preferences (defaults apply when absent)
    #[serde(default)]
    pub preferences: Option<PreferencesRequest>,
}

/// Traveler preferences. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesRequest {
    /// Longest acceptable walking leg, in metres
    pub max_walking_distance: Option<f64>,

    /// Modes to consider, highest priority first (e.g. `"bus"`, `"shared_bike"`)
    pub preferred_modes: Option<Vec<String>>,

    pub consider_weather: Option<bool>,
    pub consider_traffic: Option<bool>,
    pub carbon_conscious: Option<bool>,
}

impl PreferencesRequest {
    /// Convert to domain preferences, filling gaps from the defaults.
    pub fn to_preferences(&self) -> Result<PreferenceSet, DomainError> {
        let defaults = PreferenceSet::default();

        let modes = match &self.preferred_modes {
            Some(names) => names
                .iter()
                .map(|name| name.trim().to_lowercase().parse::<TransportMode>())
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.preferred_modes().to_vec(),
        };

        let max_walk = self
            .max_walking_distance
            .unwrap_or(defaults.max_walking_distance_m());

        Ok(PreferenceSet::new(max_walk, modes)?
            .with_weather(self.consider_weather.unwrap_or(defaults.consider_weather()))
            .with_traffic(self.consider_traffic.unwrap_or(defaults.consider_traffic()))
            .with_carbon_conscious(
                self.carbon_conscious
                    .unwrap_or(defaults.carbon_conscious()),
            ))
    }
}

/// Response with ranked routes.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    /// Best first
    pub routes: Vec<RouteResult>,

    /// Modes that produced no route, and why
    pub skipped: Vec<SkippedResult>,

    /// Conditions the routes were adjusted for
    pub conditions: ConditionsResult,
}

impl From<PlanResult> for RecommendResponse {
    fn from(result: PlanResult) -> Self {
        Self {
            routes: result
                .routes
                .iter()
                .enumerate()
                .map(|(i, r)| RouteResult::from_ranked(i + 1, r))
                .collect(),
            skipped: result.skipped.iter().map(SkippedResult::from).collect(),
            conditions: ConditionsResult::from(&result.conditions),
        }
    }
}

/// A ranked route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// 1-based position in the ranking
    pub rank: usize,

    /// Mode the route was planned for
    pub primary_mode: TransportMode,

    /// Distinct modes in travel order
    pub modes: Vec<TransportMode>,

    pub total_distance_km: f64,
    pub total_duration_min: f64,
    pub total_emission_kg: f64,

    /// Emission avoided compared with driving the same distance
    pub carbon_saved_kg: f64,

    pub score: f64,
    pub breakdown: BreakdownResult,

    /// Whether weather or traffic changed the route
    pub adjusted: bool,

    pub segments: Vec<SegmentResult>,
}

impl RouteResult {
    fn from_ranked(rank: usize, ranked: &RankedRoute) -> Self {
        let route = &ranked.route;
        Self {
            rank,
            primary_mode: route.primary_mode(),
            modes: route.modes(),
            total_distance_km: route.total_distance_km(),
            total_duration_min: route.total_duration_min(),
            total_emission_kg: route.total_emission_kg(),
            carbon_saved_kg: ranked.carbon_saved_kg(),
            score: ranked.score,
            breakdown: BreakdownResult {
                time: ranked.breakdown.time,
                emission: ranked.breakdown.emission,
                penalty: ranked.breakdown.penalty,
            },
            adjusted: route.was_adjusted(),
            segments: route.segments().iter().map(SegmentResult::from).collect(),
        }
    }
}

/// Weighted score components.
#[derive(Debug, Serialize)]
pub struct BreakdownResult {
    pub time: f64,
    pub emission: f64,
    pub penalty: f64,
}

/// One leg of a route.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub mode: TransportMode,
    pub distance_km: f64,
    pub duration_min: f64,
    pub emission_kg: f64,
    pub start: Coordinate,
    pub end: Coordinate,
    pub instructions: Vec<String>,
}

impl From<&RouteSegment> for SegmentResult {
    fn from(s: &RouteSegment) -> Self {
        Self {
            mode: s.mode(),
            distance_km: s.distance_km(),
            duration_min: s.duration_min(),
            emission_kg: s.emission_kg(),
            start: *s.start(),
            end: *s.end(),
            instructions: s.instructions().to_vec(),
        }
    }
}

/// A mode that produced no route.
#[derive(Debug, Serialize)]
pub struct SkippedResult {
    pub mode: TransportMode,
    pub reason: String,

    /// True when a weather or traffic rule excluded the mode
    pub rejected: bool,
}

impl From<&SkippedMode> for SkippedResult {
    fn from(s: &SkippedMode) -> Self {
        Self {
            mode: s.mode,
            reason: s.reason.to_string(),
            rejected: s.reason.is_rejection(),
        }
    }
}

/// Weather and traffic used for planning. `null` when not considered.
#[derive(Debug, Serialize)]
pub struct ConditionsResult {
    pub weather: Option<WeatherResult>,
    pub traffic: Option<TrafficResult>,
}

impl From<&Conditions> for ConditionsResult {
    fn from(c: &Conditions) -> Self {
        Self {
            weather: c.weather.as_ref().map(WeatherResult::from),
            traffic: c.traffic.as_ref().map(TrafficResult::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WeatherResult {
    pub temperature_c: f64,
    pub precipitation: bool,
    pub outdoor_suitable: bool,
    pub captured_at: DateTime<Utc>,
}

impl From<&WeatherSnapshot> for WeatherResult {
    fn from(w: &WeatherSnapshot) -> Self {
        Self {
            temperature_c: w.temperature_c(),
            precipitation: w.precipitation(),
            outdoor_suitable: w.outdoor_suitable(),
            captured_at: w.captured_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrafficResult {
    pub congestion_index: f64,
    pub average_speed_kmh: f64,
    pub captured_at: DateTime<Utc>,
}

impl From<&TrafficSnapshot> for TrafficResult {
    fn from(t: &TrafficSnapshot) -> Self {
        Self {
            congestion_index: t.congestion_index(),
            average_speed_kmh: t.average_speed_kmh(),
            captured_at: t.captured_at(),
        }
    }
}

/// A point given as `?lat=..&lon=..`.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub lat: f64,
    pub lon: f64,
}

impl LocationQuery {
    pub fn to_coordinate(&self) -> Result<Coordinate, DomainError> {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Stops around a point: `?lat=..&lon=..&radius=..&limit=..`.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,

    /// Search radius in metres
    pub radius: Option<f64>,

    /// Maximum number of stops returned
    pub limit: Option<usize>,
}

impl NearbyQuery {
    pub fn to_coordinate(&self) -> Result<Coordinate, DomainError> {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Stops found near a point, nearest first.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub stops: Vec<StopResult>,
}

#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: String,
    pub name: String,
    pub mode: TransportMode,
    pub location: Coordinate,

    /// Straight-line distance from the query point
    pub distance_m: f64,
}

impl StopResult {
    pub fn from_stop(stop: TransitStop, from: &Coordinate) -> Self {
        Self {
            distance_m: from.distance_m(&stop.location),
            id: stop.id,
            name: stop.name,
            mode: stop.mode,
            location: stop.location,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Why each mode was dropped, when planning failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedResult>,
}
