use std::error::Error;
use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_engine::cache::{CacheConfig, CachedGeoProvider};
use trip_engine::planner::PlannerConfig;
use trip_engine::providers::mock::{MockGeoProvider, MockWeatherProvider};
use trip_engine::providers::{
    GeoRoutingProvider, OpenMeteoClient, OpenMeteoConfig, OsmRoutingProvider, OsrmClient,
    OsrmConfig, OverpassClient, OverpassConfig, RushHourTrafficProvider, TrafficProvider,
    WeatherProvider,
};
use trip_engine::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,trip_engine=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let addr: SocketAddr = std::env::var("TRIP_ENGINE_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    let planner_config = PlannerConfig::default();
    let cache_config = CacheConfig::default();
    let traffic = RushHourTrafficProvider::default();

    // Offline mode: serve paths and stops from a fixture file
    if let Ok(path) = std::env::var("TRIP_ENGINE_MOCK_DATA") {
        warn!(fixture = %path, "Using mock providers");
        let geo = MockGeoProvider::from_json_file(&path)?;
        let state = AppState::new(
            CachedGeoProvider::new(geo, &cache_config),
            MockWeatherProvider::fair(),
            traffic,
            planner_config,
        );
        return serve(state, addr).await;
    }

    let mut osrm_config = OsrmConfig::default();
    if let Ok(url) = std::env::var("OSRM_BASE_URL") {
        osrm_config = OsrmConfig::new(url);
    }
    let mut overpass_config = OverpassConfig::default();
    if let Ok(url) = std::env::var("OVERPASS_URL") {
        overpass_config = OverpassConfig::new(url);
    }
    let mut weather_config = OpenMeteoConfig::default();
    if let Ok(url) = std::env::var("OPEN_METEO_URL") {
        weather_config = OpenMeteoConfig::new(url);
    }

    info!(
        osrm = %osrm_config.base_url,
        overpass = %overpass_config.base_url,
        open_meteo = %weather_config.base_url,
        "Configured providers"
    );

    let geo = OsmRoutingProvider::new(
        OsrmClient::new(osrm_config)?,
        OverpassClient::new(overpass_config)?,
    );
    let weather = OpenMeteoClient::new(weather_config)?;

    let state = AppState::new(
        CachedGeoProvider::new(geo, &cache_config),
        weather,
        traffic,
        planner_config,
    );
    serve(state, addr).await
}

async fn serve<G, W, T>(state: AppState<G, W, T>, addr: SocketAddr) -> Result<(), Box<dyn Error>>
where
    G: GeoRoutingProvider + 'static,
    W: WeatherProvider + 'static,
    T: TrafficProvider + 'static,
{
    let app = create_router(state);

    info!(%addr, "Trip engine listening");
    info!("  GET  /health                   - Health check");
    info!("  POST /api/v1/routes/recommend  - Plan and rank routes");
    info!("  GET  /api/v1/weather           - Current weather (?lat=&lon=)");
    info!("  GET  /api/v1/traffic           - Current traffic (?lat=&lon=)");
    info!("  GET  /api/v1/transit/nearby    - Bus stops and subway stations");
    info!("  GET  /api/v1/bikes/nearby      - Bike-share docks");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
