//! Raw provider paths to typed segments.

use crate::domain::{DomainError, RouteSegment, TransportMode};
use crate::providers::RawPath;

/// Convert a raw path into a segment for `mode`.
///
/// Distance must be positive. A missing or zero duration is derived from
/// the mode's nominal speed. Instructions come from the raw steps, or a
/// single generic line naming the mode when there are none.
///
/// # Errors
///
/// [`DomainError::InvalidPath`] for a non-positive or non-finite distance,
/// or a negative or non-finite duration.
pub fn build_segment(raw: &RawPath, mode: TransportMode) -> Result<RouteSegment, DomainError> {
    let distance_m = raw.distance_m;
    if !distance_m.is_finite() || distance_m < 0.0 {
        return Err(DomainError::InvalidPath(format!(
            "distance {distance_m} m is not a non-negative number"
        )));
    }
    if distance_m == 0.0 {
        return Err(DomainError::InvalidPath("path has zero length".to_string()));
    }

    let distance_km = distance_m / 1000.0;

    let duration_min = match raw.duration_s {
        Some(s) if !s.is_finite() || s < 0.0 => {
            return Err(DomainError::InvalidPath(format!(
                "duration {s} s is not a non-negative number"
            )));
        }
        Some(s) if s > 0.0 => s / 60.0,
        _ => baseline_duration_min(distance_km, mode),
    };

    let instructions: Vec<String> = raw
        .steps
        .iter()
        .map(|step| step.instruction.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect();

    let instructions = if instructions.is_empty() {
        vec![generic_instruction(distance_km, mode)]
    } else {
        instructions
    };

    RouteSegment::new(
        mode,
        distance_km,
        duration_min,
        raw.origin,
        raw.destination,
        instructions,
    )
    .map_err(|e| DomainError::InvalidPath(e.to_string()))
}

/// Minutes to cover `distance_km` at the mode's nominal speed.
pub fn baseline_duration_min(distance_km: f64, mode: TransportMode) -> f64 {
    distance_km / mode.speed_band().nominal_kmh() * 60.0
}

fn generic_instruction(distance_km: f64, mode: TransportMode) -> String {
    let verb = match mode {
        TransportMode::Walking => "Walk",
        TransportMode::Cycling => "Cycle",
        TransportMode::Bus => "Take the bus",
        TransportMode::Subway => "Take the subway",
        TransportMode::Driving => "Drive",
        TransportMode::SharedBike => "Ride a shared bike",
    };
    format!("{verb} {distance_km:.1} km")
}
