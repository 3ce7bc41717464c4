//! Multi-criteria route ranking.
//!
//! Each route scores
//!
//! ```text
//! w_time * (1 - duration / max_duration)
//!   + w_carbon * (1 - emission / max_emission)
//!   + w_penalty * (0 if adjusted else 1)
//! ```
//!
//! with maxima taken over the candidate set, so scores only compare routes
//! within one call.

use std::cmp::Ordering;

use crate::domain::{PreferenceSet, Route};

use super::config::{PlannerConfig, ScoreWeights};
use super::emission::carbon_saved;

/// Weighted contribution of each criterion to a score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub time: f64,
    pub emission: f64,
    pub penalty: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.time + self.emission + self.penalty
    }
}

/// A route with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRoute {
    pub route: Route,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl RankedRoute {
    /// Emission avoided compared with driving the same distance.
    pub fn carbon_saved_kg(&self) -> f64 {
        carbon_saved(&self.route)
    }
}

/// `1 - value / max`, or 1.0 when the whole set is zero on this axis.
fn normalized(value: f64, max: f64) -> f64 {
    if max > 0.0 { 1.0 - value / max } else { 1.0 }
}

fn score(route: &Route, weights: &ScoreWeights, max_duration: f64, max_emission: f64) -> ScoreBreakdown {
    let penalty = if route.was_adjusted() { 0.0 } else { 1.0 };
    ScoreBreakdown {
        time: weights.time * normalized(route.total_duration_min(), max_duration),
        emission: weights.carbon * normalized(route.total_emission_kg(), max_emission),
        penalty: weights.penalty * penalty,
    }
}

/// Score and order routes, best first.
///
/// Ties on score go to the mode listed earlier in the traveler's
/// preferences, then to the shorter trip. A single route always scores 1.0.
pub fn rank(routes: Vec<Route>, preferences: &PreferenceSet, config: &PlannerConfig) -> Vec<RankedRoute> {
    let weights = config.weights_for(preferences.carbon_conscious());

    if routes.len() == 1 {
        return routes
            .into_iter()
            .map(|route| RankedRoute {
                route,
                score: 1.0,
                breakdown: ScoreBreakdown {
                    time: weights.time,
                    emission: weights.carbon,
                    penalty: weights.penalty,
                },
            })
            .collect();
    }

    let max_duration = routes
        .iter()
        .map(Route::total_duration_min)
        .fold(0.0, f64::max);
    let max_emission = routes
        .iter()
        .map(Route::total_emission_kg)
        .fold(0.0, f64::max);

    let mut ranked: Vec<RankedRoute> = routes
        .into_iter()
        .map(|route| {
            let breakdown = score(&route, &weights, max_duration, max_emission);
            RankedRoute {
                score: breakdown.total(),
                breakdown,
                route,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        // Primary: higher score
        let score_cmp = b.score.total_cmp(&a.score);
        if score_cmp != Ordering::Equal {
            return score_cmp;
        }

        // Secondary: earlier preferred mode
        let priority = |r: &RankedRoute| {
            preferences
                .priority(r.route.primary_mode())
                .unwrap_or(usize::MAX)
        };
        let priority_cmp = priority(a).cmp(&priority(b));
        if priority_cmp != Ordering::Equal {
            return priority_cmp;
        }

        // Tertiary: shorter duration
        a.route
            .total_duration_min()
            .total_cmp(&b.route.total_duration_min())
    });

    ranked
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Coordinate, RouteSegment, TransportMode};
    use proptest::prelude::*;

    fn route_strategy() -> impl Strategy<Value = Route> {
        (
            prop::sample::select(TransportMode::ALL.to_vec()),
            0.1f64..40.0,
            1.0f64..120.0,
            any::<bool>(),
        )
            .prop_map(|(mode, km, min, adjusted)| {
                let seg = RouteSegment::new(
                    mode,
                    km,
                    min,
                    Coordinate::new(0.0, 0.0).unwrap(),
                    Coordinate::new(0.0, 0.1).unwrap(),
                    vec![],
                )
                .unwrap();
                Route::new(mode, vec![seg], adjusted).unwrap()
            })
    }

    fn prefs_strategy() -> impl Strategy<Value = PreferenceSet> {
        (
            prop::sample::subsequence(TransportMode::ALL.to_vec(), 0..=6).prop_shuffle(),
            any::<bool>(),
        )
            .prop_map(|(modes, carbon)| {
                PreferenceSet::new(1000.0, modes)
                    .unwrap()
                    .with_carbon_conscious(carbon)
            })
    }

    proptest! {
        #[test]
        fn ranking_is_deterministic(
            routes in prop::collection::vec(route_strategy(), 0..8),
            prefs in prefs_strategy(),
        ) {
            let config = PlannerConfig::default();
            let first = rank(routes.clone(), &prefs, &config);
            let second = rank(routes, &prefs, &config);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn scores_descend_and_stay_in_unit_range(
            routes in prop::collection::vec(route_strategy(), 1..8),
            prefs in prefs_strategy(),
        ) {
            let ranked = rank(routes, &prefs, &PlannerConfig::default());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
            for r in &ranked {
                prop_assert!(r.score >= -1e-12 && r.score <= 1.0 + 1e-12);
            }
        }

        #[test]
        fn equal_scores_follow_preference_order(
            routes in prop::collection::vec(route_strategy(), 2..8),
            prefs in prefs_strategy(),
        ) {
            let ranked = rank(routes, &prefs, &PlannerConfig::default());
            for pair in ranked.windows(2) {
                if pair[0].score == pair[1].score {
                    let a = prefs.priority(pair[0].route.primary_mode()).unwrap_or(usize::MAX);
                    let b = prefs.priority(pair[1].route.primary_mode()).unwrap_or(usize::MAX);
                    prop_assert!(a <= b);
                }
            }
        }
    }
}
