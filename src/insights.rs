//! Human-facing view of what the learner has picked up for the user's priorities.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::learn::{DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
use crate::preferences::UserPreferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightTrend {
    StrongPreference,
    Growing,
    Neutral,
    LowInterest,
}

impl WeightTrend {
    pub fn from_weight(w: f32) -> Self {
        if w > 1.2 {
            WeightTrend::StrongPreference
        } else if w > 1.0 {
            WeightTrend::Growing
        } else if w < 0.8 {
            WeightTrend::LowInterest
        } else {
            WeightTrend::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagInsight {
    pub tag: String,
    pub weight: f32,
    pub trend: WeightTrend,
    /// Position of `weight` inside the clamp range, in `[0, 1]`.
    pub progress: f32,
}

pub fn progress(weight: f32) -> f32 {
    ((weight - MIN_WEIGHT) / (MAX_WEIGHT - MIN_WEIGHT)).clamp(0.0, 1.0)
}

/// One row per priority tag, in priority order. Unseen tags show the default.
pub fn weight_report(prefs: &UserPreferences, weights: &BTreeMap<String, f32>) -> Vec<TagInsight> {
    prefs
        .priority_order
        .iter()
        .map(|tag| {
            let weight = weights.get(tag).copied().unwrap_or(DEFAULT_WEIGHT);
            TagInsight {
                tag: tag.clone(),
                weight,
                trend: WeightTrend::from_weight(weight),
                progress: progress(weight),
            }
        })
        .collect()
}
