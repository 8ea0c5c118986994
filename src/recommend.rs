//! # Recommendation pipeline
//! Scoring engine + score adjuster + sort. No I/O, suitable for unit tests.
//!
//! Policy: disqualified items and items that match none of the user's priorities
//! are left out; items the engine cannot score are reported in `skipped` and the
//! pass continues. The rest are sorted by adjusted score, highest first.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::catalog::Item;
use crate::learn::{apply_learning, WeightStore};
use crate::preferences::UserPreferences;
use crate::scoring::{score, ScoreOutcome, TieBreak};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub item: &'a Item,
    pub base_score: f32,
    pub adjusted_score: f32,
    /// Item tags that are in the user's priority list, in priority order.
    pub highlighted_tags: Vec<String>,
}

impl Recommendation<'_> {
    /// How much learning moved the score.
    pub fn delta(&self) -> f32 {
        self.adjusted_score - self.base_score
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedItem {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking<'a> {
    pub recommendations: Vec<Recommendation<'a>>,
    pub skipped: Vec<SkippedItem>,
    pub disqualified: usize,
}

pub fn get_recommendations<'a>(
    prefs: &UserPreferences,
    weights: &WeightStore,
    catalog: &'a [Item],
    tie_break: TieBreak,
) -> Ranking<'a> {
    let mut ranking = Ranking::default();

    for item in catalog {
        let base = match score(prefs, item) {
            ScoreOutcome::Scored(s) => s,
            ScoreOutcome::Disqualified(why) => {
                debug!(target: "recommend", id = %item.id, ?why, "disqualified");
                ranking.disqualified += 1;
                continue;
            }
            ScoreOutcome::Invalid(reason) => {
                warn!(target: "recommend", id = %item.id, %reason, "skipping item");
                ranking.skipped.push(SkippedItem {
                    id: item.id.clone(),
                    reason,
                });
                continue;
            }
        };
        if base <= 0.0 {
            continue;
        }

        let highlighted_tags = prefs
            .priority_order
            .iter()
            .filter(|t| item.has_tag(t))
            .cloned()
            .collect();

        ranking.recommendations.push(Recommendation {
            item,
            base_score: base,
            adjusted_score: apply_learning(weights, base, &item.sustainability_tags),
            highlighted_tags,
        });
    }

    // `sort_by` is stable, so equal keys keep catalog order.
    ranking.recommendations.sort_by(|a, b| {
        b.adjusted_score
            .total_cmp(&a.adjusted_score)
            .then_with(|| match tie_break {
                TieBreak::CatalogOrder => Ordering::Equal,
                TieBreak::PriceAscending => a.item.price.total_cmp(&b.item.price),
            })
    });

    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::BudgetRange;

    fn prefs() -> UserPreferences {
        UserPreferences::new(
            ["vegan", "organic", "fair-trade"],
            BudgetRange::new(10.0, 100.0),
            ["palm-oil"],
        )
    }

    fn ids(r: &Ranking<'_>) -> Vec<String> {
        r.recommendations.iter().map(|x| x.item.id.clone()).collect()
    }

    #[test]
    fn excludes_out_of_budget_avoided_and_unmatched() {
        let items = vec![
            Item::new("cheap", "A", 5.0, ["vegan"]),
            Item::new("pricey", "B", 150.0, ["vegan", "organic"]),
            Item::new("avoid", "C", 20.0, ["vegan", "palm-oil"]),
            Item::new("none", "D", 20.0, ["recycled"]),
            Item::new("ok", "E", 20.0, ["organic"]),
        ];
        let r = get_recommendations(&prefs(), &WeightStore::new(), &items, TieBreak::default());
        assert_eq!(ids(&r), vec!["ok"]);
        assert_eq!(r.disqualified, 3);
        assert!(r.skipped.is_empty());
    }

    #[test]
    fn invalid_item_is_skipped_not_fatal() {
        let items = vec![
            Item::new("bad", "A", -3.0, ["vegan"]),
            Item::new("good", "B", 30.0, ["vegan"]),
        ];
        let r = get_recommendations(&prefs(), &WeightStore::new(), &items, TieBreak::default());
        assert_eq!(ids(&r), vec!["good"]);
        assert_eq!(r.skipped.len(), 1);
        assert_eq!(r.skipped[0].id, "bad");
    }

    #[test]
    fn ties_follow_the_tie_break() {
        let items = vec![
            Item::new("a", "A", 50.0, ["organic"]),
            Item::new("b", "B", 20.0, ["organic"]),
            Item::new("c", "C", 30.0, ["organic"]),
        ];
        let w = WeightStore::new();
        let stable = get_recommendations(&prefs(), &w, &items, TieBreak::CatalogOrder);
        assert_eq!(ids(&stable), vec!["a", "b", "c"]);
        let cheap = get_recommendations(&prefs(), &w, &items, TieBreak::PriceAscending);
        assert_eq!(ids(&cheap), vec!["b", "c", "a"]);
    }

    #[test]
    fn learned_weights_reorder_results() {
        let items = vec![
            Item::new("veg", "A", 20.0, ["vegan"]),
            Item::new("org", "B", 20.0, ["organic", "recycled"]),
        ];
        let mut w = WeightStore::new();
        // base: veg = 3, org = 2
        w.adjust("vegan", -0.7); // 0.3 -> veg = 0.9
        let r = get_recommendations(&prefs(), &w, &items, TieBreak::default());
        assert_eq!(ids(&r), vec!["org", "veg"]);
        assert!(r.recommendations[1].delta() < 0.0);
        assert_eq!(r.recommendations[0].highlighted_tags, vec!["organic"]);
    }

    #[test]
    fn empty_inputs_give_empty_ranking() {
        let none = UserPreferences::new(
            Vec::<String>::new(),
            BudgetRange::new(0.0, 1000.0),
            Vec::<String>::new(),
        );
        let items = vec![Item::new("a", "A", 20.0, ["vegan"])];
        let w = WeightStore::new();
        assert!(get_recommendations(&none, &w, &items, TieBreak::default())
            .recommendations
            .is_empty());
        assert!(get_recommendations(&prefs(), &w, &[], TieBreak::default())
            .recommendations
            .is_empty());
    }
}
