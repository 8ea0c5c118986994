//! User value priorities, budget, and avoid-list for one session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::tags::{normalize_set, normalize_tag};

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct BudgetRange {
    pub min: f32,
    pub max: f32,
}

impl BudgetRange {
    /// Build a range; swaps the bounds if given in the wrong order.
    pub fn new(min: f32, max: f32) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn contains(&self, price: f32) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

impl From<[f32; 2]> for BudgetRange {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<BudgetRange> for [f32; 2] {
    fn from(b: BudgetRange) -> Self {
        [b.min, b.max]
    }
}

/// Wire shape accepted from callers and config before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesInput {
    #[serde(default)]
    pub priority_order: Vec<String>,
    pub budget_range: BudgetRange,
    #[serde(default)]
    pub avoid_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PreferencesInput")]
pub struct UserPreferences {
    /// Most important first. No duplicates.
    pub priority_order: Vec<String>,
    pub budget_range: BudgetRange,
    pub avoid_tags: BTreeSet<String>,
}

impl UserPreferences {
    pub fn new<P, A>(priority_order: P, budget_range: BudgetRange, avoid_tags: A) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let priority_order = priority_order
            .into_iter()
            .filter_map(|t| normalize_tag(t.as_ref()))
            .filter(|t| seen.insert(t.clone()))
            .collect();
        Self {
            priority_order,
            budget_range,
            avoid_tags: normalize_set(avoid_tags),
        }
    }

    /// 0-indexed rank of `tag` in the priority list.
    pub fn rank_of(&self, tag: &str) -> Option<usize> {
        self.priority_order.iter().position(|t| t == tag)
    }
}

impl From<PreferencesInput> for UserPreferences {
    fn from(p: PreferencesInput) -> Self {
        Self::new(p.priority_order, p.budget_range, p.avoid_tags)
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self::new(
            ["vegan", "organic", "fair-trade"],
            BudgetRange::new(10.0, 100.0),
            Vec::<String>::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_are_normalized_and_deduplicated() {
        let p = UserPreferences::new(
            ["Vegan", "organic", "vegan", " "],
            BudgetRange::new(0.0, 50.0),
            ["Palm-Oil"],
        );
        assert_eq!(p.priority_order, vec!["vegan", "organic"]);
        assert_eq!(p.rank_of("organic"), Some(1));
        assert!(p.avoid_tags.contains("palm-oil"));
    }

    #[test]
    fn budget_is_inclusive_and_swaps_bounds() {
        let b = BudgetRange::new(100.0, 10.0);
        assert_eq!((b.min, b.max), (10.0, 100.0));
        assert!(b.contains(10.0));
        assert!(b.contains(100.0));
        assert!(!b.contains(100.01));
    }

    #[test]
    fn deserializes_from_json_shape() {
        let p: UserPreferences = serde_json::from_str(
            r#"{"priority_order": ["organic", "Vegan"], "budget_range": [5, 20]}"#,
        )
        .unwrap();
        assert_eq!(p.priority_order, vec!["organic", "vegan"]);
        assert_eq!(p.budget_range, BudgetRange::new(5.0, 20.0));
        assert!(p.avoid_tags.is_empty());
    }
}
