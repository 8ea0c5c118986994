//! Per-tag learned multipliers.
//!
//! Every stored value lives in `[MIN_WEIGHT, MAX_WEIGHT]`. The only write path is
//! [`WeightStore::adjust`], which clamps before storing, so readers never see an
//! out-of-range multiplier. Tags that were never observed read as `DEFAULT_WEIGHT`.

use serde::Serialize;
use std::collections::BTreeMap;

pub const MIN_WEIGHT: f32 = 0.3;
pub const MAX_WEIGHT: f32 = 2.0;
pub const DEFAULT_WEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightStore {
    weights: BTreeMap<String, f32>,
}

impl WeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with each of `tags` seeded at the default multiplier.
    pub fn seeded<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        store.initialize_weights(tags);
        store
    }

    /// Seed absent tags at 1.0. Already-present tags keep their learned value.
    pub fn initialize_weights<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for t in tags {
            self.seed(t.as_ref());
        }
    }

    /// Owned snapshot; mutating it has no effect on the store.
    pub fn get_weights(&self) -> BTreeMap<String, f32> {
        self.weights.clone()
    }

    /// Learned multiplier, or the default for tags never seen.
    pub fn multiplier_for(&self, tag: &str) -> f32 {
        self.weights.get(tag).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.weights.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub(crate) fn seed(&mut self, tag: &str) {
        if !self.weights.contains_key(tag) {
            self.weights.insert(tag.to_string(), DEFAULT_WEIGHT);
        }
    }

    /// Add `delta` to the tag's multiplier (seeding it first) and clamp.
    /// Returns the stored value.
    pub(crate) fn adjust(&mut self, tag: &str, delta: f32) -> f32 {
        let slot = self
            .weights
            .entry(tag.to_string())
            .or_insert(DEFAULT_WEIGHT);
        *slot = clamp_weight(*slot + delta);
        debug_assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(slot));
        *slot
    }
}

/// Clamp to `[MIN_WEIGHT, MAX_WEIGHT]`. NaN collapses to the default.
pub fn clamp_weight(x: f32) -> f32 {
    if x.is_nan() {
        DEFAULT_WEIGHT
    } else {
        x.clamp(MIN_WEIGHT, MAX_WEIGHT)
    }
}
