//! Domain types for the trip recommendation engine.
//!
//! This module contains the core data model: coordinates, transport modes,
//! environmental snapshots, segments, routes and traveler preferences.
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod conditions;
mod coordinate;
mod error;
mod mode;
mod preferences;
mod route;
mod segment;

pub use conditions::{TrafficSnapshot, WeatherSnapshot};
pub use coordinate::Coordinate;
pub use error::DomainError;
pub use mode::{SpeedBand, TransportMode};
pub use preferences::PreferenceSet;
pub use route::Route;
pub use segment::RouteSegment;
