// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod catalog;
pub mod config;
pub mod insights;
pub mod preferences;
pub mod recommend;
pub mod scoring;
pub mod session;
pub mod tags;

// Adaptive weighting (weight store, interaction learner, score adjuster)
pub mod learn;

pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::catalog::{load_catalog_default, load_catalog_from, Catalog, Item};
pub use crate::learn::{
    apply_learning, ActionType, InteractionEvent, InteractionLearner, LearnError, WeightStore,
};
pub use crate::preferences::{BudgetRange, UserPreferences};
pub use crate::recommend::{get_recommendations, Ranking, Recommendation};
pub use crate::scoring::{score, ScoreOutcome, TieBreak};
pub use crate::session::{Session, SessionHandle};

/// Build the HTTP router from env/config files, as the binary does.
pub fn app() -> anyhow::Result<axum::Router> {
    let state = api::AppState::from_env()?;
    Ok(router(state))
}
