//! Policy constants for planning and ranking.

use std::time::Duration;

/// Relative weight of each ranking criterion. Components sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub time: f64,
    pub carbon: f64,
    pub penalty: f64,
}

impl ScoreWeights {
    pub const fn new(time: f64, carbon: f64, penalty: f64) -> Self {
        Self {
            time,
            carbon,
            penalty,
        }
    }

    pub fn sum(&self) -> f64 {
        self.time + self.carbon + self.penalty
    }
}

/// Configuration for the route planner.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Upper bound on each individual provider call.
    /// A call that takes longer counts as unavailable for its branch.
    pub provider_timeout: Duration,

    /// Congestion index at or below which road traffic adds no delay.
    pub congestion_threshold: f64,

    /// Road duration multiplier is `congestion_base + congestion_slope * index`.
    pub congestion_base: f64,
    pub congestion_slope: f64,

    /// Weights used when the traveler is carbon conscious.
    pub carbon_conscious_weights: ScoreWeights,

    /// Weights used otherwise.
    pub default_weights: ScoreWeights,

    /// Access and egress walks shorter than this (metres) are omitted.
    pub min_connector_m: f64,

    /// Maximum number of ranked routes to return.
    pub max_results: usize,
}

impl PlannerConfig {
    /// Set the per-call provider timeout.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Set the congestion multiplier coefficients.
    pub fn with_congestion(mut self, threshold: f64, base: f64, slope: f64) -> Self {
        self.congestion_threshold = threshold;
        self.congestion_base = base;
        self.congestion_slope = slope;
        self
    }

    pub fn with_weights(mut self, carbon_conscious: ScoreWeights, default: ScoreWeights) -> Self {
        self.carbon_conscious_weights = carbon_conscious;
        self.default_weights = default;
        self
    }

    pub fn with_min_connector(mut self, metres: f64) -> Self {
        self.min_connector_m = metres;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Weights for a traveler's carbon preference.
    pub fn weights_for(&self, carbon_conscious: bool) -> ScoreWeights {
        if carbon_conscious {
            self.carbon_conscious_weights
        } else {
            self.default_weights
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            congestion_threshold: 1.0,
            congestion_base: 0.5,
            congestion_slope: 0.5,
            carbon_conscious_weights: ScoreWeights::new(0.5, 0.4, 0.1),
            default_weights: ScoreWeights::new(0.7, 0.2, 0.1),
            min_connector_m: 1.0,
            max_results: 10,
        }
    }
}
