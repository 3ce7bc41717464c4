//! Web layer for the trip recommendation engine.
//!
//! Provides a health check, a JSON endpoint that plans and ranks routes, and
//! thin lookups for current weather, traffic and nearby stops.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
