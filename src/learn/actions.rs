//! Interaction kinds and the signed adjustment each one applies.
//!
//! The table is data, not control flow: adding an action means adding a variant
//! and a row, nothing in the learner changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Looked at an item without buying it.
    View,
    AddToCart,
    Purchase,
    /// Explicitly hid or rejected an item.
    Dismiss,
}

impl ActionType {
    pub const ALL: [ActionType; 4] = [
        ActionType::View,
        ActionType::AddToCart,
        ActionType::Purchase,
        ActionType::Dismiss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::View => "view",
            ActionType::AddToCart => "add_to_cart",
            ActionType::Purchase => "purchase",
            ActionType::Dismiss => "dismiss",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action type `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for ActionType {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ActionType::ALL
            .into_iter()
            .find(|a| a.as_str() == norm)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),
    #[error("adjustment for `{action}` must be finite (got {value})")]
    NonFinite { action: ActionType, value: f32 },
}

/// Declared `action -> signed multiplier delta` mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AdjustmentTable {
    deltas: BTreeMap<ActionType, f32>,
}

impl AdjustmentTable {
    /// Empty table; every action is rejected until a row is added.
    pub fn empty() -> Self {
        Self {
            deltas: BTreeMap::new(),
        }
    }

    pub fn with(mut self, action: ActionType, delta: f32) -> Result<Self, TableError> {
        if !delta.is_finite() {
            return Err(TableError::NonFinite {
                action,
                value: delta,
            });
        }
        self.deltas.insert(action, delta);
        Ok(self)
    }

    /// Build from string keys (config files). Unknown names are rejected.
    pub fn from_named<'a, I>(rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        rows.into_iter().try_fold(Self::empty(), |table, (name, delta)| {
            let action = name.parse::<ActionType>()?;
            table.with(action, delta)
        })
    }

    pub fn delta(&self, action: ActionType) -> Option<f32> {
        self.deltas.get(&action).copied()
    }
}

impl Default for AdjustmentTable {
    /// Purchases reinforce strongly; a bare view reads as mild disinterest.
    fn default() -> Self {
        let deltas = [
            (ActionType::View, -0.05),
            (ActionType::AddToCart, 0.05),
            (ActionType::Purchase, 0.10),
            (ActionType::Dismiss, -0.10),
        ]
        .into_iter()
        .collect();
        Self { deltas }
    }
}
