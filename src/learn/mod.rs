// src/learn/mod.rs
//! Adaptive weighting: the per-tag weight store, the interaction learner that
//! mutates it, and the adjuster that folds it back into base scores.

pub mod actions;
pub mod adjust;
pub mod learner;
pub mod weights;

// Re-export convenient types.
pub use crate::learn::actions::{ActionType, AdjustmentTable, TableError, UnknownAction};
pub use crate::learn::adjust::{aggregate_multiplier, apply_learning};
pub use crate::learn::learner::{
    InteractionEvent, InteractionLearner, InteractionPayload, LearnError, TrackOutcome,
};
pub use crate::learn::weights::{WeightStore, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
