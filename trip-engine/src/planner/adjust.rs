//! Weather and traffic corrections.
//!
//! Rules, in precedence order:
//!
//! 1. Unsuitable outdoor weather rejects a walking, cycling or shared-bike
//!    primary segment outright.
//! 2. Congestion above the free-flow threshold stretches bus and driving
//!    segments by `base + slope * congestion_index`.
//! 3. Everything else passes through unchanged.
//!
//! Each axis is skipped entirely when the traveler opted out of it.

use std::fmt;

use thiserror::Error;

use crate::domain::{PreferenceSet, RouteSegment, TrafficSnapshot, TransportMode, WeatherSnapshot};

use super::config::PlannerConfig;

/// Where a segment sits in its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// The leg the route was planned for.
    Primary,
    /// A short walk to or from a stop. Never rejected on weather.
    Connector,
}

/// Conditions that apply to one planning request.
///
/// `None` means the axis is off, either because the traveler opted out or
/// because the provider could not be reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    pub weather: Option<WeatherSnapshot>,
    pub traffic: Option<TrafficSnapshot>,
}

impl Conditions {
    pub fn new(weather: Option<WeatherSnapshot>, traffic: Option<TrafficSnapshot>) -> Self {
        Self { weather, traffic }
    }

    /// Drop the axes the traveler opted out of.
    pub fn for_preferences(self, preferences: &PreferenceSet) -> Self {
        Self {
            weather: self.weather.filter(|_| preferences.consider_weather()),
            traffic: self.traffic.filter(|_| preferences.consider_traffic()),
        }
    }
}

/// Why a condition rule excluded a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    Weather,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Weather => f.write_str("weather unsuitable for outdoor travel"),
        }
    }
}

/// A condition rule excluded this mode from the candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{mode} rejected: {reason}")]
pub struct ModeRejected {
    pub mode: TransportMode,
    pub reason: RejectionReason,
}

/// A segment after condition rules were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedSegment {
    pub segment: RouteSegment,
    /// Duration multiplier applied (1.0 when unchanged)
    pub multiplier: f64,
    /// Whether any rule changed the segment
    pub adjusted: bool,
}

/// Duration multiplier for a congestion index.
pub fn congestion_multiplier(congestion_index: f64, config: &PlannerConfig) -> f64 {
    if congestion_index > config.congestion_threshold {
        config.congestion_base + config.congestion_slope * congestion_index
    } else {
        1.0
    }
}

/// Apply the condition rules to one segment.
///
/// # Errors
///
/// [`ModeRejected`] when the weather rule excludes a primary segment's mode.
pub fn adjust(
    segment: RouteSegment,
    role: SegmentRole,
    conditions: &Conditions,
    config: &PlannerConfig,
) -> Result<AdjustedSegment, ModeRejected> {
    let mode = segment.mode();

    if let Some(weather) = &conditions.weather {
        if role == SegmentRole::Primary && mode.is_outdoor() && !weather.outdoor_suitable() {
            return Err(ModeRejected {
                mode,
                reason: RejectionReason::Weather,
            });
        }
    }

    let multiplier = match &conditions.traffic {
        Some(traffic) if mode.is_road_traffic() => {
            congestion_multiplier(traffic.congestion_index(), config)
        }
        _ => 1.0,
    };

    // A non-positive or non-finite multiplier cannot scale a duration
    if multiplier == 1.0 || !multiplier.is_finite() || multiplier <= 0.0 {
        return Ok(AdjustedSegment {
            segment,
            multiplier: 1.0,
            adjusted: false,
        });
    }

    Ok(AdjustedSegment {
        segment: segment.scale_duration(multiplier),
        multiplier,
        adjusted: true,
    })
}
