//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from provider/IO errors.

use super::Coordinate;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Latitude or longitude outside the WGS-84 range
    #[error("invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate {
        lat: f64,
        lon: f64,
        reason: &'static str,
    },

    /// Mode name not in the closed set of transport modes
    #[error("unknown transport mode: {0}")]
    UnknownMode(String),

    /// Malformed provider path data
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Segment values violate their invariants
    #[error("invalid segment: {0}")]
    InvalidSegment(&'static str),

    /// Route has no segments
    #[error("route must have at least one segment")]
    EmptyRoute,

    /// Consecutive segments don't share an endpoint
    #[error("segments are not connected: {from} does not meet {to}")]
    SegmentsNotConnected { from: Coordinate, to: Coordinate },

    /// Preference values out of range
    #[error("invalid preferences: {0}")]
    InvalidPreferences(&'static str),

    /// Weather or traffic values out of range
    #[error("invalid conditions: {0}")]
    InvalidConditions(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::UnknownMode("hovercraft".into());
        assert_eq!(err.to_string(), "unknown transport mode: hovercraft");

        let err = DomainError::InvalidPath("negative distance".into());
        assert_eq!(err.to_string(), "invalid path: negative distance");

        let err = DomainError::EmptyRoute;
        assert_eq!(err.to_string(), "route must have at least one segment");

        let from = Coordinate::new(51.5, -0.1).unwrap();
        let to = Coordinate::new(51.6, -0.2).unwrap();
        let err = DomainError::SegmentsNotConnected { from, to };
        assert_eq!(
            err.to_string(),
            "segments are not connected: 51.500000,-0.100000 does not meet 51.600000,-0.200000"
        );
    }
}
