//! Base match score of one item against a user's preferences.
//!
//! Base score = sum over priority rank `i` (0-indexed) of `len(priority_order) - i`
//! for every priority tag the item carries. Tags outside the priority list add
//! nothing. Items outside the budget or carrying an avoided tag are disqualified.
//!
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::catalog::Item;
use crate::preferences::UserPreferences;

/// Why an item was removed from the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disqualification {
    UnderBudget { price: f32, min: f32 },
    OverBudget { price: f32, max: f32 },
    AvoidedTag { tag: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Scored(f32),
    Disqualified(Disqualification),
    /// Item data the engine cannot score (negative or non-finite price).
    Invalid(String),
}

impl ScoreOutcome {
    pub fn base_score(&self) -> Option<f32> {
        match self {
            ScoreOutcome::Scored(s) => Some(*s),
            _ => None,
        }
    }
}

/// Secondary ordering for items whose adjusted scores are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep catalog order (stable sort).
    #[default]
    CatalogOrder,
    /// Cheaper first, then catalog order.
    PriceAscending,
}

/// Contribution of a priority tag at `rank` in a list of `len` priorities.
#[inline]
pub fn rank_contribution(len: usize, rank: usize) -> f32 {
    len.saturating_sub(rank) as f32
}

pub fn score(prefs: &UserPreferences, item: &Item) -> ScoreOutcome {
    if !item.price.is_finite() || item.price < 0.0 {
        return ScoreOutcome::Invalid(format!("invalid price {}", item.price));
    }

    let budget = prefs.budget_range;
    if item.price < budget.min {
        return ScoreOutcome::Disqualified(Disqualification::UnderBudget {
            price: item.price,
            min: budget.min,
        });
    }
    if item.price > budget.max {
        return ScoreOutcome::Disqualified(Disqualification::OverBudget {
            price: item.price,
            max: budget.max,
        });
    }

    if let Some(tag) = item
        .sustainability_tags
        .iter()
        .find(|t| prefs.avoid_tags.contains(*t))
    {
        return ScoreOutcome::Disqualified(Disqualification::AvoidedTag { tag: tag.clone() });
    }

    let len = prefs.priority_order.len();
    let total = prefs
        .priority_order
        .iter()
        .enumerate()
        .filter(|(_, tag)| item.has_tag(tag))
        .map(|(rank, _)| rank_contribution(len, rank))
        .sum::<f32>();

    ScoreOutcome::Scored(total)
}
