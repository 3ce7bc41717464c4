//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::PlannerConfig;

/// Shared application state.
///
/// Contains the providers and planner configuration needed to handle
/// requests. Generic over providers so tests can run the handlers against
/// mocks.
pub struct AppState<G, W, T> {
    /// Routing and stop lookup
    pub geo: Arc<G>,

    /// Current weather
    pub weather: Arc<W>,

    /// Current traffic
    pub traffic: Arc<T>,

    /// Planner configuration
    pub config: Arc<PlannerConfig>,
}

impl<G, W, T> AppState<G, W, T> {
    /// Create a new app state.
    pub fn new(geo: G, weather: W, traffic: T, config: PlannerConfig) -> Self {
        Self {
            geo: Arc::new(geo),
            weather: Arc::new(weather),
            traffic: Arc::new(traffic),
            config: Arc::new(config),
        }
    }
}

// Derived Clone would demand G, W, T: Clone
impl<G, W, T> Clone for AppState<G, W, T> {
    fn clone(&self) -> Self {
        Self {
            geo: Arc::clone(&self.geo),
            weather: Arc::clone(&self.weather),
            traffic: Arc::clone(&self.traffic),
            config: Arc::clone(&self.config),
        }
    }
}
