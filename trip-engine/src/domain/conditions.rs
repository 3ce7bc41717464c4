//! Environmental snapshots: weather and traffic.
//!
//! Snapshots are immutable once fetched and belong to the planning request
//! that asked for them.

use chrono::{DateTime, Utc};

use super::DomainError;

/// Current weather at a location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    temperature_c: f64,
    precipitation: bool,
    outdoor_suitable: bool,
    captured_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Create a weather snapshot.
    pub fn new(
        temperature_c: f64,
        precipitation: bool,
        outdoor_suitable: bool,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !temperature_c.is_finite() {
            return Err(DomainError::InvalidConditions("temperature must be finite"));
        }
        Ok(Self {
            temperature_c,
            precipitation,
            outdoor_suitable,
            captured_at,
        })
    }

    /// Air temperature in °C.
    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    /// Whether it is currently raining or snowing.
    pub fn precipitation(&self) -> bool {
        self.precipitation
    }

    /// Whether walking and cycling are reasonable right now.
    pub fn outdoor_suitable(&self) -> bool {
        self.outdoor_suitable
    }

    /// When the provider captured this snapshot.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Current road traffic for a region.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSnapshot {
    congestion_index: f64,
    average_speed_kmh: f64,
    captured_at: DateTime<Utc>,
}

impl TrafficSnapshot {
    /// Create a traffic snapshot.
    ///
    /// `congestion_index` is 1.0 for free flow; larger is slower.
    pub fn new(
        congestion_index: f64,
        average_speed_kmh: f64,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !congestion_index.is_finite() || congestion_index < 0.0 {
            return Err(DomainError::InvalidConditions(
                "congestion index must be a non-negative number",
            ));
        }
        if !average_speed_kmh.is_finite() || average_speed_kmh < 0.0 {
            return Err(DomainError::InvalidConditions(
                "average speed must be a non-negative number",
            ));
        }
        Ok(Self {
            congestion_index,
            average_speed_kmh,
            captured_at,
        })
    }

    /// Congestion index (1.0 = free flow).
    pub fn congestion_index(&self) -> f64 {
        self.congestion_index
    }

    /// Average road speed in km/h.
    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    /// When the provider captured this snapshot.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}
