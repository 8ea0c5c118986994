//! Interaction learner: validates events and folds them into the weight store.
//!
//! Each event is validated in full before the store is touched, then every tag
//! on it is seeded (if new), shifted by the action's delta, and clamped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use super::actions::{ActionType, AdjustmentTable, UnknownAction};
use super::weights::WeightStore;
use crate::catalog::Item;
use crate::tags::normalize_tag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LearnError {
    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),
    #[error("action `{0}` has no configured adjustment")]
    UnconfiguredAction(ActionType),
    #[error("event is missing `product_tags`")]
    MissingTags,
    #[error("event contains a blank tag")]
    EmptyTag,
}

/// A validated interaction, consumed once by [`InteractionLearner::track_interaction`].
///
/// Only built through [`InteractionEvent::new`] or [`InteractionEvent::for_item`],
/// so its tags are always normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionEvent {
    action_type: ActionType,
    product_tags: BTreeSet<String>,
    /// Opaque ordering token supplied by the caller.
    timestamp: String,
}

impl InteractionEvent {
    pub fn new<I, S>(action_type: ActionType, tags: I, timestamp: &str) -> Result<Self, LearnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let product_tags = tags
            .into_iter()
            .map(|t| normalize_tag(t.as_ref()).ok_or(LearnError::EmptyTag))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            action_type,
            product_tags,
            timestamp: timestamp.to_string(),
        })
    }

    /// Event for acting on a catalog item; carries the item's full tag set.
    pub fn for_item(action_type: ActionType, item: &Item, timestamp: &str) -> Self {
        Self {
            action_type,
            product_tags: item.sustainability_tags.clone(),
            timestamp: timestamp.to_string(),
        }
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn product_tags(&self) -> &BTreeSet<String> {
        &self.product_tags
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Untrusted wire shape (HTTP body, demo scripts).
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    pub action_type: String,
    #[serde(default)]
    pub product_tags: Option<Vec<String>>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl TryFrom<InteractionPayload> for InteractionEvent {
    type Error = LearnError;

    fn try_from(p: InteractionPayload) -> Result<Self, Self::Error> {
        let action = p.action_type.parse::<ActionType>()?;
        let tags = p.product_tags.ok_or(LearnError::MissingTags)?;
        InteractionEvent::new(action, tags, p.timestamp.as_deref().unwrap_or_default())
    }
}

/// Result of applying one event: the new multiplier for every touched tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackOutcome {
    pub action_type: ActionType,
    pub delta: f32,
    pub updated: Vec<(String, f32)>,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionLearner {
    store: WeightStore,
    table: AdjustmentTable,
}

impl InteractionLearner {
    pub fn new(table: AdjustmentTable) -> Self {
        Self {
            store: WeightStore::new(),
            table,
        }
    }

    pub fn with_store(store: WeightStore, table: AdjustmentTable) -> Self {
        Self { store, table }
    }

    pub fn store(&self) -> &WeightStore {
        &self.store
    }

    pub fn initialize_weights<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.initialize_weights(tags);
    }

    pub fn get_weights(&self) -> std::collections::BTreeMap<String, f32> {
        self.store.get_weights()
    }

    /// Apply one event. On error the store is left untouched.
    pub fn track_interaction(&mut self, event: &InteractionEvent) -> Result<TrackOutcome, LearnError> {
        let delta = self
            .table
            .delta(event.action_type)
            .ok_or(LearnError::UnconfiguredAction(event.action_type))?;

        let updated: Vec<(String, f32)> = event
            .product_tags
            .iter()
            .map(|tag| (tag.clone(), self.store.adjust(tag, delta)))
            .collect();

        debug!(
            target: "learning",
            action = %event.action_type,
            delta,
            ts = %event.timestamp,
            updated = ?updated,
            "interaction applied"
        );

        Ok(TrackOutcome {
            action_type: event.action_type,
            delta,
            updated,
        })
    }

    /// Validate an untrusted payload and apply it.
    pub fn track_payload(&mut self, payload: InteractionPayload) -> Result<TrackOutcome, LearnError> {
        let event = InteractionEvent::try_from(payload)?;
        self.track_interaction(&event)
    }

    /// Replay `action` on the first `limit` catalog items carrying `tag`.
    /// Returns how many events were applied.
    pub fn simulate(
        &mut self,
        items: &[Item],
        tag: &str,
        action: ActionType,
        limit: usize,
    ) -> Result<usize, LearnError> {
        let tag = normalize_tag(tag).ok_or(LearnError::EmptyTag)?;
        if self.table.delta(action).is_none() {
            return Err(LearnError::UnconfiguredAction(action));
        }
        // The tag itself is tracked even when no item carries it yet.
        self.store.seed(&tag);

        let mut applied = 0;
        for item in items.iter().filter(|it| it.has_tag(&tag)).take(limit) {
            let event = InteractionEvent::for_item(action, item, "simulated");
            self.track_interaction(&event)?;
            applied += 1;
        }
        debug!(target: "learning", %tag, %action, applied, "simulation finished");
        Ok(applied)
    }
}
