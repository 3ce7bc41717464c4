//! OSRM route service client.
//!
//! Fetches point-to-point paths with turn-by-turn steps from an OSRM server.
//! Coordinates are sent as `lon,lat` pairs, as OSRM expects.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use std::time::Duration;

use serde::Deserialize;

use crate::domain::{Coordinate, TransportMode};

use super::error::ProviderError;
use super::types::{RawPath, RawStep};

/// Default base URL for the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default user agent for OSRM requests.
const DEFAULT_USER_AGENT: &str = "trip-engine/0.1";

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the OSRM server
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string for requests
    pub user_agent: String,
}

impl OsrmConfig {
    /// Create a config for the given server.
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

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// OSRM routing profile for a mode, if OSRM can route it at all.
///
/// Buses run on the road network, so they use the car profile; their
/// duration is left to the mode's baseline speed since car timings ignore
/// stops. Subways have no road profile.
fn profile_for(mode: TransportMode) -> Option<&'static str> {
    match mode {
        TransportMode::Walking => Some("foot"),
        TransportMode::Cycling | TransportMode::SharedBike => Some("bike"),
        TransportMode::Driving | TransportMode::Bus => Some("car"),
        TransportMode::Subway => None,
    }
}

/// OSRM route service client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    /// Create a new OSRM client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the route URL for a pair of points.
    fn route_url(&self, profile: &str, origin: &Coordinate, destination: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            profile,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude()
        )
    }

    /// Fetch a path between two points for a mode.
    pub async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<RawPath, ProviderError> {
        let profile = profile_for(mode)
            .ok_or_else(|| ProviderError::unavailable(mode, "no OSRM profile for this mode"))?;

        let url = self.route_url(profile, &origin, &destination);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("steps", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: RouteResponse = serde_json::from_str(&body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

        // OSRM answers NoRoute with HTTP 400, so inspect the payload first
        if parsed.code == "NoRoute" || parsed.code == "NoSegment" {
            return Err(ProviderError::unavailable(
                mode,
                parsed.message.unwrap_or(parsed.code),
            ));
        }

        if !status.is_success() || !parsed.is_ok() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: parsed.message.unwrap_or(parsed.code),
            });
        }

        let route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::unavailable(mode, "empty route list"))?;

        Ok(route.into_raw_path(origin, destination, mode))
    }
}

/// OSRM route service response.
#[derive(Debug, Deserialize)]
struct RouteResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Metres
    distance: f64,
    /// Seconds
    duration: f64,
    geometry: Option<Geometry>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[lon, lat]` pairs
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: String,
    maneuver: Maneuver,
}

#[derive(Debug, Deserialize)]
struct Maneuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
}

impl OsrmRoute {
    fn into_raw_path(
        self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> RawPath {
        let geometry = self
            .geometry
            .map(|g| {
                g.coordinates
                    .into_iter()
                    .filter_map(|[lon, lat]| Coordinate::new(lat, lon).ok())
                    .collect()
            })
            .unwrap_or_default();

        let steps = self
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|step| RawStep {
                instruction: describe_step(&step),
                distance_m: step.distance,
                duration_s: step.duration,
            })
            .collect();

        let duration_s = match mode {
            TransportMode::Bus => None,
            _ => Some(self.duration),
        };

        RawPath {
            origin,
            destination,
            distance_m: self.distance,
            duration_s,
            geometry,
            steps,
        }
    }
}

/// Render an OSRM maneuver as a short instruction.
fn describe_step(step: &OsrmStep) -> String {
    let road = if step.name.is_empty() {
        String::new()
    } else {
        format!(" onto {}", step.name)
    };
    let modifier = step.maneuver.modifier.as_deref().unwrap_or("");

    match step.maneuver.kind.as_str() {
        "depart" => {
            if step.name.is_empty() {
                "Depart".to_string()
            } else {
                format!("Head out on {}", step.name)
            }
        }
        "arrive" => "Arrive at destination".to_string(),
        "turn" | "end of road" | "fork" if !modifier.is_empty() => {
            format!("Turn {modifier}{road}")
        }
        "roundabout" | "rotary" => format!("Take the roundabout{road}"),
        kind => {
            let mut text = capitalize(kind);
            if !modifier.is_empty() {
                text.push(' ');
                text.push_str(modifier);
            }
            text.push_str(&road);
            text
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
