//! # Session
//! Explicit per-user context: preferences + learner + ranking options. Every core
//! call goes through a `Session`, there is no ambient global state.
//!
//! [`SessionHandle`] wraps a session in `Arc<RwLock<_>>`: learning takes the write
//! lock, ranking and snapshots take the read lock, so a ranking never reads a
//! weight store halfway through an event.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use metrics::counter;
use tracing::{info, warn};

use crate::catalog::Item;
use crate::config::AssistantConfig;
use crate::insights::{weight_report, TagInsight};
use crate::learn::{
    ActionType, AdjustmentTable, InteractionEvent, InteractionLearner, InteractionPayload,
    LearnError, TrackOutcome, WeightStore,
};
use crate::preferences::UserPreferences;
use crate::recommend::{get_recommendations, Ranking};
use crate::scoring::TieBreak;

#[derive(Debug, Clone)]
pub struct Session {
    preferences: UserPreferences,
    learner: InteractionLearner,
    tie_break: TieBreak,
}

impl Session {
    /// New session; the weight store is seeded from the priority list.
    pub fn new(preferences: UserPreferences, table: AdjustmentTable, tie_break: TieBreak) -> Self {
        let store = WeightStore::seeded(&preferences.priority_order);
        Self {
            preferences,
            learner: InteractionLearner::with_store(store, table),
            tie_break,
        }
    }

    pub fn from_config(cfg: &AssistantConfig) -> Self {
        Self::new(
            cfg.preferences.clone(),
            cfg.adjustments.clone(),
            cfg.ranking.tie_break,
        )
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Replace preferences; newly listed priorities are seeded, learned ones kept.
    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.learner.initialize_weights(&preferences.priority_order);
        self.preferences = preferences;
    }

    pub fn set_tie_break(&mut self, tie_break: TieBreak) {
        self.tie_break = tie_break;
    }

    pub fn weights(&self) -> &WeightStore {
        self.learner.store()
    }

    pub fn initialize_weights<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.learner.initialize_weights(tags);
    }

    pub fn get_weights(&self) -> BTreeMap<String, f32> {
        self.learner.get_weights()
    }

    pub fn insights(&self) -> Vec<TagInsight> {
        weight_report(&self.preferences, &self.learner.get_weights())
    }

    pub fn track_interaction(&mut self, event: &InteractionEvent) -> Result<TrackOutcome, LearnError> {
        let res = self.learner.track_interaction(event);
        record_outcome(&res);
        res
    }

    pub fn track_payload(&mut self, payload: InteractionPayload) -> Result<TrackOutcome, LearnError> {
        let res = self.learner.track_payload(payload);
        record_outcome(&res);
        res
    }

    pub fn simulate(
        &mut self,
        items: &[Item],
        tag: &str,
        action: ActionType,
        limit: usize,
    ) -> Result<usize, LearnError> {
        let applied = self.learner.simulate(items, tag, action, limit)?;
        counter!("interactions_tracked_total", "action" => action.as_str()).increment(applied as u64);
        info!(target: "learning", tag, %action, applied, "simulated interactions");
        Ok(applied)
    }

    pub fn recommend<'a>(&self, catalog: &'a [Item]) -> Ranking<'a> {
        counter!("recommendation_requests_total").increment(1);
        get_recommendations(&self.preferences, self.learner.store(), catalog, self.tie_break)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(
            UserPreferences::default(),
            AdjustmentTable::default(),
            TieBreak::default(),
        )
    }
}

fn record_outcome(res: &Result<TrackOutcome, LearnError>) {
    match res {
        Ok(out) => {
            counter!("interactions_tracked_total", "action" => out.action_type.as_str())
                .increment(1);
        }
        Err(e) => {
            counter!("interactions_rejected_total").increment(1);
            warn!(target: "learning", error = %e, "interaction rejected");
        }
    }
}

/// A threadsafe handle over one session (single writer, many readers).
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Read access. A poisoned lock still yields the data: writes are clamped
    /// per tag, so the store is valid even if a writer panicked.
    pub fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn track_interaction(&self, event: &InteractionEvent) -> Result<TrackOutcome, LearnError> {
        self.write().track_interaction(event)
    }

    pub fn get_weights(&self) -> BTreeMap<String, f32> {
        self.read().get_weights()
    }
}
