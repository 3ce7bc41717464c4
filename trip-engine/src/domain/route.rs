//! Route type.
//!
//! A `Route` is a complete trip from origin to destination, possibly
//! chaining several segments (walk to stop, ride, walk to destination).

use super::{Coordinate, DomainError, RouteSegment, TransportMode};

/// A complete candidate route.
///
/// Totals are always computed from the segments, never stored, so they
/// cannot drift from the segment values.
///
/// # Invariants
///
/// - At least one segment
/// - Consecutive segments connect (end of one = start of next)
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    primary_mode: TransportMode,
    segments: Vec<RouteSegment>,
    adjusted: bool,
}

impl Route {
    /// Constructs a route from ordered segments.
    ///
    /// `primary_mode` is the mode the route was planned for (the ride of a
    /// transit route, or the only leg of a door-to-door route). `adjusted`
    /// records whether weather or traffic changed any segment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - Segments list is empty
    /// - Segments don't connect (end != next start)
    pub fn new(
        primary_mode: TransportMode,
        segments: Vec<RouteSegment>,
        adjusted: bool,
    ) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyRoute);
        }

        for window in segments.windows(2) {
            let prev_end = window[0].end();
            let next_start = window[1].start();
            if prev_end != next_start {
                return Err(DomainError::SegmentsNotConnected {
                    from: *prev_end,
                    to: *next_start,
                });
            }
        }

        Ok(Route {
            primary_mode,
            segments,
            adjusted,
        })
    }

    /// Returns all segments in travel order.
    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// The mode this route was planned for.
    pub fn primary_mode(&self) -> TransportMode {
        self.primary_mode
    }

    /// Whether a condition rule changed any segment of this route.
    pub fn was_adjusted(&self) -> bool {
        self.adjusted
    }

    /// Start of the first segment.
    pub fn origin(&self) -> &Coordinate {
        // Non-empty by construction
        self.segments[0].start()
    }

    /// End of the last segment.
    pub fn destination(&self) -> &Coordinate {
        self.segments[self.segments.len() - 1].end()
    }

    /// Sum of segment distances, in km.
    pub fn total_distance_km(&self) -> f64 {
        self.segments.iter().map(|s| s.distance_km()).sum()
    }

    /// Sum of segment durations, in minutes.
    pub fn total_duration_min(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_min()).sum()
    }

    /// Sum of segment emissions, in kg CO2.
    pub fn total_emission_kg(&self) -> f64 {
        self.segments.iter().map(|s| s.emission_kg()).sum()
    }

    /// Distinct modes used, in travel order.
    pub fn modes(&self) -> Vec<TransportMode> {
        let mut modes: Vec<TransportMode> = Vec::new();
        for seg in &self.segments {
            if modes.last() != Some(&seg.mode()) {
                modes.push(seg.mode());
            }
        }
        modes
    }

    /// Distance covered on foot, in km.
    pub fn walking_distance_km(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.mode() == TransportMode::Walking)
            .map(|s| s.distance_km())
            .sum()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mode_strategy() -> impl Strategy<Value = TransportMode> {
        prop::sample::select(TransportMode::ALL.to_vec())
    }

    /// A chain of connected segments along the equator.
    fn segments_strategy() -> impl Strategy<Value = Vec<RouteSegment>> {
        prop::collection::vec((mode_strategy(), 0.01f64..50.0, 0.5f64..180.0), 1..8).prop_map(
            |legs| {
                legs.into_iter()
                    .enumerate()
                    .map(|(i, (mode, km, min))| {
                        let from = Coordinate::new(0.0, i as f64 * 0.01).unwrap();
                        let to = Coordinate::new(0.0, (i + 1) as f64 * 0.01).unwrap();
                        RouteSegment::new(mode, km, min, from, to, vec![]).unwrap()
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn totals_equal_segment_sums(segments in segments_strategy()) {
            let distance: f64 = segments.iter().map(|s| s.distance_km()).sum();
            let duration: f64 = segments.iter().map(|s| s.duration_min()).sum();
            let emission: f64 = segments.iter().map(|s| s.emission_kg()).sum();

            let route = Route::new(segments[0].mode(), segments, false).unwrap();

            prop_assert_eq!(route.total_distance_km(), distance);
            prop_assert_eq!(route.total_duration_min(), duration);
            prop_assert_eq!(route.total_emission_kg(), emission);
        }

        #[test]
        fn segment_emission_is_distance_times_factor(segments in segments_strategy()) {
            for s in &segments {
                prop_assert_eq!(s.emission_kg(), s.distance_km() * s.mode().emission_factor());
            }
        }
    }
}
