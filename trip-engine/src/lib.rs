//! Multi-modal trip recommendation engine.
//!
//! Given an origin, a destination and traveler preferences, plans candidate
//! routes across walking, cycling, bus, subway, driving and shared bikes,
//! adjusts them for current weather and traffic, estimates their carbon
//! cost and ranks them.

pub mod cache;
pub mod domain;
pub mod planner;
pub mod providers;
pub mod web;
