//! HTTP route handlers.

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures::future::join_all;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::{DomainError, TransportMode};
use crate::planner::{PlanError, Planner, SkippedMode};
use crate::providers::{GeoRoutingProvider, ProviderError, TrafficProvider, WeatherProvider};

use super::dto::*;
use super::state::AppState;

/// Default search radius for nearby stops, in metres.
const DEFAULT_NEARBY_RADIUS_M: f64 = 1000.0;

/// Largest accepted search radius, in metres.
const MAX_NEARBY_RADIUS_M: f64 = 5000.0;

const DEFAULT_NEARBY_LIMIT: usize = 10;
const MAX_NEARBY_LIMIT: usize = 50;

/// Create the application router.
pub fn create_router<G, W, T>(state: AppState<G, W, T>) -> Router
where
    G: GeoRoutingProvider + 'static,
    W: WeatherProvider + 'static,
    T: TrafficProvider + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/routes/recommend", post(recommend::<G, W, T>))
        .route("/api/v1/weather", get(weather::<G, W, T>))
        .route("/api/v1/traffic", get(traffic::<G, W, T>))
        .route("/api/v1/transit/nearby", get(transit_nearby::<G, W, T>))
        .route("/api/v1/bikes/nearby", get(bikes_nearby::<G, W, T>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan and rank routes between two points.
async fn recommend<G, W, T>(
    State(state): State<AppState<G, W, T>>,
    body: Bytes,
) -> Result<Json<RecommendResponse>, AppError>
where
    G: GeoRoutingProvider,
    W: WeatherProvider,
    T: TrafficProvider,
{
    // Parse JSON manually so we can log the body on failure
    let req: RecommendRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(&body), "Invalid request JSON");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let preferences = req
        .preferences
        .unwrap_or_default()
        .to_preferences()
        .map_err(AppError::from)?;

    let planner = Planner::new(
        state.geo.as_ref(),
        state.weather.as_ref(),
        state.traffic.as_ref(),
        state.config.as_ref(),
    );

    let result = planner
        .plan(req.origin, req.destination, &preferences)
        .await
        .map_err(AppError::from)?;

    Ok(Json(RecommendResponse::from(result)))
}

/// Current weather at a point.
async fn weather<G, W, T>(
    State(state): State<AppState<G, W, T>>,
    Query(req): Query<LocationQuery>,
) -> Result<Json<WeatherResult>, AppError>
where
    W: WeatherProvider,
{
    let location = req.to_coordinate()?;
    let snapshot = within(
        state.config.provider_timeout,
        state.weather.fetch_weather(location),
    )
    .await?;
    Ok(Json(WeatherResult::from(&snapshot)))
}

/// Current road traffic around a point.
async fn traffic<G, W, T>(
    State(state): State<AppState<G, W, T>>,
    Query(req): Query<LocationQuery>,
) -> Result<Json<TrafficResult>, AppError>
where
    T: TrafficProvider,
{
    let region = req.to_coordinate()?;
    let snapshot = within(
        state.config.provider_timeout,
        state.traffic.fetch_traffic(region),
    )
    .await?;
    Ok(Json(TrafficResult::from(&snapshot)))
}

/// Bus stops and subway stations near a point.
async fn transit_nearby<G, W, T>(
    State(state): State<AppState<G, W, T>>,
    Query(req): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse>, AppError>
where
    G: GeoRoutingProvider,
{
    nearby(&state, &req, &[TransportMode::Bus, TransportMode::Subway]).await
}

/// Bike-share docks near a point.
async fn bikes_nearby<G, W, T>(
    State(state): State<AppState<G, W, T>>,
    Query(req): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse>, AppError>
where
    G: GeoRoutingProvider,
{
    nearby(&state, &req, &[TransportMode::SharedBike]).await
}

/// Look up stops for each mode and merge them, nearest first.
async fn nearby<G, W, T>(
    state: &AppState<G, W, T>,
    req: &NearbyQuery,
    modes: &[TransportMode],
) -> Result<Json<NearbyResponse>, AppError>
where
    G: GeoRoutingProvider,
{
    let location = req.to_coordinate()?;

    let radius_m = req.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_M);
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(AppError::BadRequest {
            message: format!("Invalid radius: {radius_m}"),
        });
    }
    let radius_m = radius_m.min(MAX_NEARBY_RADIUS_M);
    let limit = req.limit.unwrap_or(DEFAULT_NEARBY_LIMIT).min(MAX_NEARBY_LIMIT);

    let lookups = modes.iter().map(|&mode| {
        within(
            state.config.provider_timeout,
            state.geo.nearby_stops(location, mode, radius_m, limit),
        )
    });

    let mut stops = Vec::new();
    for found in join_all(lookups).await {
        stops.extend(
            found?
                .into_iter()
                .map(|stop| StopResult::from_stop(stop, &location)),
        );
    }
    stops.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    stops.truncate(limit);

    debug!(location = %location, radius_m, found = stops.len(), "Nearby stops");
    Ok(Json(NearbyResponse { stops }))
}

/// Run a provider call under the configured timeout.
async fn within<F, V>(limit: Duration, call: F) -> Result<V, ProviderError>
where
    F: Future<Output = Result<V, ProviderError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit)),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    PlanningFailed { skipped: Vec<SkippedMode> },
    Internal { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::PlanningFailed { skipped } => AppError::PlanningFailed { skipped },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    skipped: Vec::new(),
                },
            ),
            AppError::PlanningFailed { skipped } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "No route could be planned for any requested mode".to_string(),
                    skipped: skipped.iter().map(SkippedResult::from).collect(),
                },
            ),
            AppError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: message,
                    skipped: Vec::new(),
                },
            ),
        };

        if status.is_server_error() {
            error!(status = %status, error = %body.error, "Request failed");
        } else {
            warn!(status = %status, error = %body.error, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}
