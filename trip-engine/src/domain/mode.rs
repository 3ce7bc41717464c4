//! Transport mode enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A range of typical travel speeds for a mode, in km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBand {
    /// Lower bound of typical speed
    pub min_kmh: f64,
    /// Upper bound of typical speed
    pub max_kmh: f64,
}

impl SpeedBand {
    const fn new(min_kmh: f64, max_kmh: f64) -> Self {
        Self { min_kmh, max_kmh }
    }

    /// The nominal speed: midpoint of the band.
    pub fn nominal_kmh(&self) -> f64 {
        (self.min_kmh + self.max_kmh) / 2.0
    }
}

/// The closed set of transport modes the engine can plan with.
///
/// Each mode carries a fixed emission factor and a baseline speed band
/// used when a provider does not report a duration.
///
/// # Examples
///
/// ```
/// use trip_engine::domain::TransportMode;
///
/// let mode: TransportMode = "shared_bike".parse().unwrap();
/// assert_eq!(mode, TransportMode::SharedBike);
/// assert_eq!(TransportMode::Bus.emission_factor(), 0.08);
/// assert!("hovercraft".parse::<TransportMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Walking,
    Cycling,
    Bus,
    Subway,
    Driving,
    SharedBike,
}

impl TransportMode {
    /// Every mode, in declaration order.
    pub const ALL: [TransportMode; 6] = [
        TransportMode::Walking,
        TransportMode::Cycling,
        TransportMode::Bus,
        TransportMode::Subway,
        TransportMode::Driving,
        TransportMode::SharedBike,
    ];

    /// Returns the wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
            TransportMode::Bus => "bus",
            TransportMode::Subway => "subway",
            TransportMode::Driving => "driving",
            TransportMode::SharedBike => "shared_bike",
        }
    }

    /// Emission factor in kg CO2 per km.
    pub fn emission_factor(&self) -> f64 {
        match self {
            TransportMode::Walking | TransportMode::Cycling | TransportMode::SharedBike => 0.0,
            TransportMode::Subway => 0.04,
            TransportMode::Bus => 0.08,
            TransportMode::Driving => 0.2,
        }
    }

    /// Typical speed range for this mode.
    pub fn speed_band(&self) -> SpeedBand {
        match self {
            TransportMode::Walking => SpeedBand::new(4.0, 6.0),
            TransportMode::Cycling => SpeedBand::new(12.0, 18.0),
            TransportMode::SharedBike => SpeedBand::new(10.0, 14.0),
            TransportMode::Bus => SpeedBand::new(15.0, 25.0),
            TransportMode::Subway => SpeedBand::new(30.0, 40.0),
            TransportMode::Driving => SpeedBand::new(25.0, 55.0),
        }
    }

    /// True for modes exposed to the weather.
    pub fn is_outdoor(&self) -> bool {
        matches!(
            self,
            TransportMode::Walking | TransportMode::Cycling | TransportMode::SharedBike
        )
    }

    /// True for modes that share the road with general traffic.
    pub fn is_road_traffic(&self) -> bool {
        matches!(self, TransportMode::Bus | TransportMode::Driving)
    }

    /// True for modes boarded at a stop or dock rather than door to door.
    ///
    /// Routes for these modes are chained as walk + ride + walk.
    pub fn is_station_based(&self) -> bool {
        matches!(
            self,
            TransportMode::Bus | TransportMode::Subway | TransportMode::SharedBike
        )
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| DomainError::UnknownMode(s.to_string()))
    }
}
