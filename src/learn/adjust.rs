//! Fold learned multipliers back into a base score.
//!
//! Aggregation: arithmetic mean of `multiplier_for(tag)` over the item's tags.
//! Unlearned tags count as 1.0 rather than being skipped, so an item is not
//! boosted just because most of its tags have never been observed.

use super::weights::WeightStore;

/// Mean multiplier for `tags`; 1.0 for an empty tag set.
pub fn aggregate_multiplier<'a, I>(store: &WeightStore, tags: I) -> f32
where
    I: IntoIterator<Item = &'a String>,
{
    let (sum, n) = tags
        .into_iter()
        .fold((0.0f32, 0usize), |(sum, n), t| (sum + store.multiplier_for(t), n + 1));
    if n == 0 {
        1.0
    } else {
        sum / n as f32
    }
}

pub fn apply_learning<'a, I>(store: &WeightStore, base_score: f32, item_tags: I) -> f32
where
    I: IntoIterator<Item = &'a String>,
{
    base_score * aggregate_multiplier(store, item_tags)
}
