//! Route segment type.
//!
//! A `RouteSegment` is one uninterrupted leg of a trip in a single mode.

use super::{Coordinate, DomainError, TransportMode};

/// One leg of a route in a single transport mode.
///
/// # Invariants
///
/// - `distance_km > 0` and `duration_min > 0`
/// - `emission_kg == distance_km * mode.emission_factor()`, always
///
/// Emission is derived from distance and mode, never set directly, so
/// changing the duration (as condition adjustments do) leaves it intact.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    mode: TransportMode,
    distance_km: f64,
    duration_min: f64,
    start: Coordinate,
    end: Coordinate,
    emission_kg: f64,
    instructions: Vec<String>,
}

impl RouteSegment {
    /// Construct a segment, validating distance and duration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if distance or duration is not a positive finite number.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_engine::domain::{Coordinate, RouteSegment, TransportMode};
    ///
    /// let a = Coordinate::new(39.90, 116.40).unwrap();
    /// let b = Coordinate::new(39.95, 116.45).unwrap();
    /// let seg = RouteSegment::new(TransportMode::Bus, 4.0, 15.0, a, b, vec![]).unwrap();
    ///
    /// assert_eq!(seg.emission_kg(), 4.0 * 0.08);
    /// ```
    pub fn new(
        mode: TransportMode,
        distance_km: f64,
        duration_min: f64,
        start: Coordinate,
        end: Coordinate,
        instructions: Vec<String>,
    ) -> Result<Self, DomainError> {
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(DomainError::InvalidSegment("distance must be positive"));
        }
        if !duration_min.is_finite() || duration_min <= 0.0 {
            return Err(DomainError::InvalidSegment("duration must be positive"));
        }
        Ok(Self {
            mode,
            distance_km,
            duration_min,
            start,
            end,
            emission_kg: distance_km * mode.emission_factor(),
            instructions,
        })
    }

    /// Returns this segment with its duration multiplied by `factor`.
    ///
    /// A factor that is not a positive finite number leaves the segment as is.
    pub(crate) fn scale_duration(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            self.duration_min *= factor;
        }
        self
    }

    /// Returns this segment with its emission re-derived from distance and mode.
    pub(crate) fn with_derived_emission(mut self) -> Self {
        self.emission_kg = self.distance_km * self.mode.emission_factor();
        self
    }

    /// Transport mode of this leg.
    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Distance in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Duration in minutes.
    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    /// Where the leg starts.
    pub fn start(&self) -> &Coordinate {
        &self.start
    }

    /// Where the leg ends.
    pub fn end(&self) -> &Coordinate {
        &self.end
    }

    /// Carbon emission in kg CO2.
    pub fn emission_kg(&self) -> f64 {
        self.emission_kg
    }

    /// Human-readable instructions, in travel order.
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }
}
