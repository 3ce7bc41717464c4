//! Trip planning: from provider paths to ranked routes.
//!
//! The pipeline for one request is
//!
//! 1. fan out to the routing provider once per preferred mode (walk to a
//!    stop, ride, walk on for station-based modes), alongside one weather
//!    and one traffic fetch;
//! 2. turn raw paths into typed segments;
//! 3. apply weather and traffic rules, which may reject a mode outright;
//! 4. chain segments into routes and rank them.
//!
//! Only step 1 awaits anything. The rest are plain functions.

mod adjust;
mod assemble;
mod config;
mod emission;
mod rank;
mod segment;

pub use adjust::{
    AdjustedSegment, Conditions, ModeRejected, RejectionReason, SegmentRole, adjust,
    congestion_multiplier,
};
pub use assemble::{CandidateSet, PlanError, PlanResult, Planner, SkipReason, SkippedMode};
pub use config::{PlannerConfig, ScoreWeights};
pub use emission::{carbon_saved, driving_baseline, estimate, route_emission};
pub use rank::{RankedRoute, ScoreBreakdown, rank};
pub use segment::{baseline_duration_min, build_segment};
