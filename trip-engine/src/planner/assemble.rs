//! Route assembly.
//!
//! One planning request fans out a branch per preferred mode, plus one
//! weather and one traffic fetch, and waits for all of them. Each provider
//! call is bounded by its own timeout. A branch that fails (no route,
//! provider error, timeout, malformed data, walking limit) drops its mode
//! and records why; the request only fails when no mode survives.

use std::future::Future;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::domain::{Coordinate, DomainError, PreferenceSet, Route, RouteSegment, TransportMode};
use crate::providers::{
    GeoRoutingProvider, ProviderError, RawPath, TrafficProvider, TransitStop, WeatherProvider,
};

use super::adjust::{Conditions, RejectionReason, SegmentRole, adjust};
use super::config::PlannerConfig;
use super::emission::estimate;
use super::rank::{RankedRoute, rank};
use super::segment::build_segment;

/// Why a mode produced no route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    /// The provider had no route, failed, or timed out.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// A condition rule excluded the mode.
    #[error("rejected: {0}")]
    Rejected(RejectionReason),

    /// The provider returned data that could not form a segment.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A walking leg would be longer than the traveler allows.
    #[error("walking leg of {leg_m:.0} m exceeds limit of {limit_m:.0} m")]
    ExceedsWalkingLimit { leg_m: f64, limit_m: f64 },
}

impl SkipReason {
    /// Whether the mode was dropped by a condition rule rather than for lack of data.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SkipReason::Rejected(_))
    }
}

impl From<ProviderError> for SkipReason {
    fn from(err: ProviderError) -> Self {
        SkipReason::Unavailable(err.to_string())
    }
}

/// A mode that did not make it into the candidate set.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMode {
    pub mode: TransportMode,
    pub reason: SkipReason,
}

/// Errors surfaced to the caller of the planner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("no route could be planned; {} mode(s) skipped", .skipped.len())]
    PlanningFailed { skipped: Vec<SkippedMode> },
}

/// Routes built for a request, before ranking.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    /// Never empty
    pub routes: Vec<Route>,
    pub skipped: Vec<SkippedMode>,
    /// Conditions the routes were adjusted for
    pub conditions: Conditions,
}

/// Ranked output of a planning request.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// Best first, at most `max_results`
    pub routes: Vec<RankedRoute>,
    pub skipped: Vec<SkippedMode>,
    pub conditions: Conditions,
}

/// One built leg awaiting condition adjustment.
type Leg = (RouteSegment, SegmentRole);

/// Route planner over a set of providers.
pub struct Planner<'a, G, W, T> {
    geo: &'a G,
    weather: &'a W,
    traffic: &'a T,
    config: &'a PlannerConfig,
}

impl<'a, G, W, T> Planner<'a, G, W, T>
where
    G: GeoRoutingProvider,
    W: WeatherProvider,
    T: TrafficProvider,
{
    pub fn new(geo: &'a G, weather: &'a W, traffic: &'a T, config: &'a PlannerConfig) -> Self {
        Self {
            geo,
            weather,
            traffic,
            config,
        }
    }

    /// Plan and rank routes between two points.
    pub async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        preferences: &PreferenceSet,
    ) -> Result<PlanResult, PlanError> {
        let candidates = self.assemble(origin, destination, preferences).await?;

        let mut routes = rank(candidates.routes, preferences, self.config);
        routes.truncate(self.config.max_results);

        debug!(
            routes = routes.len(),
            skipped = candidates.skipped.len(),
            "Planning complete"
        );

        Ok(PlanResult {
            routes,
            skipped: candidates.skipped,
            conditions: candidates.conditions,
        })
    }

    /// Build a candidate route for each preferred mode.
    ///
    /// # Errors
    ///
    /// [`PlanError::PlanningFailed`] if no mode yields a route.
    pub async fn assemble(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        preferences: &PreferenceSet,
    ) -> Result<CandidateSet, PlanError> {
        let branches = preferences
            .preferred_modes()
            .iter()
            .map(|&mode| async move {
                (mode, self.legs_for_mode(origin, destination, mode, preferences).await)
            });

        let (conditions, outcomes) = tokio::join!(
            self.fetch_conditions(origin, destination, preferences),
            join_all(branches)
        );

        let mut routes = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();

        for (mode, outcome) in outcomes {
            let built = outcome.and_then(|legs| self.finish_route(mode, legs, &conditions));
            match built {
                Ok(route) => {
                    trace!(
                        mode = %mode,
                        duration_min = route.total_duration_min(),
                        adjusted = route.was_adjusted(),
                        "Built candidate route"
                    );
                    routes.push(route);
                }
                Err(reason) => {
                    debug!(mode = %mode, reason = %reason, "Dropping mode");
                    skipped.push(SkippedMode { mode, reason });
                }
            }
        }

        if routes.is_empty() {
            return Err(PlanError::PlanningFailed { skipped });
        }

        Ok(CandidateSet {
            routes,
            skipped,
            conditions,
        })
    }

    /// Fetch weather and traffic for the axes the traveler cares about.
    ///
    /// A failed fetch turns that axis off for the request.
    async fn fetch_conditions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        preferences: &PreferenceSet,
    ) -> Conditions {
        let weather = async {
            if !preferences.consider_weather() {
                return None;
            }
            match self.bounded(self.weather.fetch_weather(origin)).await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(location = %origin, error = %e, "Weather unavailable, ignoring weather");
                    None
                }
            }
        };

        let region = origin.midpoint(&destination);
        let traffic = async {
            if !preferences.consider_traffic() {
                return None;
            }
            match self.bounded(self.traffic.fetch_traffic(region)).await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(region = %region, error = %e, "Traffic unavailable, ignoring traffic");
                    None
                }
            }
        };

        let (weather, traffic) = tokio::join!(weather, traffic);
        Conditions::new(weather, traffic).for_preferences(preferences)
    }

    /// Run a provider call under the per-call timeout.
    async fn bounded<F, V>(&self, call: F) -> Result<V, ProviderError>
    where
        F: Future<Output = Result<V, ProviderError>>,
    {
        let limit = self.config.provider_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(limit)),
        }
    }

    /// Fetch and build the unadjusted legs for one mode.
    async fn legs_for_mode(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
        preferences: &PreferenceSet,
    ) -> Result<Vec<Leg>, SkipReason> {
        if mode.is_station_based() {
            return self
                .station_legs(origin, destination, mode, preferences)
                .await;
        }

        let limit_m = preferences.max_walking_distance_m();

        // Fail fast: a walk can never be shorter than the straight line
        if mode == TransportMode::Walking {
            let straight_m = origin.distance_m(&destination);
            if straight_m > limit_m {
                return Err(SkipReason::ExceedsWalkingLimit {
                    leg_m: straight_m,
                    limit_m,
                });
            }
        }

        let raw = self
            .bounded(self.geo.compute_path(origin, destination, mode))
            .await?;

        if mode == TransportMode::Walking {
            check_walk(&raw, limit_m)?;
        }

        let segment = build(&raw, mode)?;
        Ok(vec![(segment, SegmentRole::Primary)])
    }

    /// Walk to the nearest stop, ride, walk from the stop nearest the destination.
    async fn station_legs(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
        preferences: &PreferenceSet,
    ) -> Result<Vec<Leg>, SkipReason> {
        let limit_m = preferences.max_walking_distance_m();

        let (board, alight) = tokio::join!(
            self.bounded(self.geo.nearest_stop(origin, mode, limit_m)),
            self.bounded(self.geo.nearest_stop(destination, mode, limit_m)),
        );
        let board = require_stop(board?, mode, "origin", limit_m)?;
        let alight = require_stop(alight?, mode, "destination", limit_m)?;

        if board.location == alight.location {
            return Err(SkipReason::Unavailable(format!(
                "origin and destination share the nearest {mode} stop ({})",
                board.name
            )));
        }

        let min_connector_m = self.config.min_connector_m;
        let access_needed = origin.distance_m(&board.location) >= min_connector_m;
        let egress_needed = alight.location.distance_m(&destination) >= min_connector_m;

        // Ride from the walk endpoints, or straight from origin/destination when there is no walk
        let ride_from = if access_needed { board.location } else { origin };
        let ride_to = if egress_needed { alight.location } else { destination };

        trace!(
            mode = %mode,
            board = %board.name,
            alight = %alight.name,
            access_needed,
            egress_needed,
            "Resolved stops"
        );

        let access = async {
            if access_needed {
                Some(self.connector(origin, board.location, limit_m).await)
            } else {
                None
            }
        };
        let ride = self.bounded(self.geo.compute_path(ride_from, ride_to, mode));
        let egress = async {
            if egress_needed {
                Some(self.connector(alight.location, destination, limit_m).await)
            } else {
                None
            }
        };

        let (access, ride, egress) = tokio::join!(access, ride, egress);

        let mut legs = Vec::with_capacity(3);
        if let Some(walk) = access {
            legs.push((walk?, SegmentRole::Connector));
        }
        legs.push((build(&ride?, mode)?, SegmentRole::Primary));
        if let Some(walk) = egress {
            legs.push((walk?, SegmentRole::Connector));
        }

        Ok(legs)
    }

    /// An access or egress walk, held to the walking limit.
    async fn connector(
        &self,
        from: Coordinate,
        to: Coordinate,
        limit_m: f64,
    ) -> Result<RouteSegment, SkipReason> {
        let raw = self
            .bounded(self.geo.compute_path(from, to, TransportMode::Walking))
            .await?;
        check_walk(&raw, limit_m)?;
        build(&raw, TransportMode::Walking)
    }

    /// Apply conditions and emissions, then chain the legs into a route.
    fn finish_route(
        &self,
        mode: TransportMode,
        legs: Vec<Leg>,
        conditions: &Conditions,
    ) -> Result<Route, SkipReason> {
        let mut segments = Vec::with_capacity(legs.len());
        let mut adjusted = false;

        for (segment, role) in legs {
            let result = adjust(segment, role, conditions, self.config)
                .map_err(|rejected| SkipReason::Rejected(rejected.reason))?;
            adjusted |= result.adjusted;
            segments.push(estimate(result.segment));
        }

        Route::new(mode, segments, adjusted).map_err(|e| SkipReason::InvalidPath(e.to_string()))
    }
}

fn build(raw: &RawPath, mode: TransportMode) -> Result<RouteSegment, SkipReason> {
    build_segment(raw, mode).map_err(|e| match e {
        DomainError::InvalidPath(detail) => SkipReason::InvalidPath(detail),
        other => SkipReason::InvalidPath(other.to_string()),
    })
}

fn check_walk(raw: &RawPath, limit_m: f64) -> Result<(), SkipReason> {
    if raw.distance_m > limit_m {
        return Err(SkipReason::ExceedsWalkingLimit {
            leg_m: raw.distance_m,
            limit_m,
        });
    }
    Ok(())
}

fn require_stop(
    stop: Option<TransitStop>,
    mode: TransportMode,
    near: &str,
    radius_m: f64,
) -> Result<TransitStop, SkipReason> {
    stop.ok_or_else(|| {
        SkipReason::Unavailable(format!(
            "no {mode} stop within {radius_m:.0} m of the {near}"
        ))
    })
}

#[cfg(test)]
#[path = "assemble_tests.rs"]
mod tests;
