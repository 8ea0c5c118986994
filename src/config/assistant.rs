// src/config/assistant.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{env, fs, path::Path, path::PathBuf};
use tracing::info;

use crate::learn::AdjustmentTable;
use crate::preferences::UserPreferences;
use crate::scoring::TieBreak;

pub const ENV_CONFIG_PATH: &str = "ASSISTANT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/assistant.toml";

fn default_simulate_limit() -> usize {
    3
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    /// Catalog JSON path; `$ASSISTANT_CATALOG_PATH` still wins.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingSection {
    #[serde(default)]
    pub tie_break: TieBreak,
}

#[derive(Debug, Clone, Deserialize)]
struct LearningSection {
    #[serde(default = "default_simulate_limit")]
    simulate_limit: usize,
    /// Missing section → built-in table. Present section replaces it entirely.
    #[serde(default)]
    adjustments: Option<BTreeMap<String, f32>>,
}

impl Default for LearningSection {
    fn default() -> Self {
        Self {
            simulate_limit: default_simulate_limit(),
            adjustments: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    catalog: CatalogSection,
    #[serde(default)]
    preferences: Option<UserPreferences>,
    #[serde(default)]
    ranking: RankingSection,
    #[serde(default)]
    learning: LearningSection,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub catalog: CatalogSection,
    /// Preferences a fresh session starts with.
    pub preferences: UserPreferences,
    pub ranking: RankingSection,
    pub adjustments: AdjustmentTable,
    pub simulate_limit: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogSection::default(),
            preferences: UserPreferences::default(),
            ranking: RankingSection::default(),
            adjustments: AdjustmentTable::default(),
            simulate_limit: default_simulate_limit(),
        }
    }
}

impl AssistantConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(s).context("parsing assistant config")?;

        let adjustments = match raw.learning.adjustments {
            Some(rows) => AdjustmentTable::from_named(rows.iter().map(|(k, v)| (k.as_str(), *v)))
                .context("invalid [learning.adjustments]")?,
            None => AdjustmentTable::default(),
        };

        Ok(Self {
            catalog: raw.catalog,
            preferences: raw.preferences.unwrap_or_default(),
            ranking: raw.ranking,
            adjustments,
            simulate_limit: raw.learning.simulate_limit.max(1),
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading assistant config from {}", path.display()))?;
        let cfg = Self::from_toml_str(&data)?;
        info!(target: "config", path = %path.display(), "assistant config loaded");
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $ASSISTANT_CONFIG_PATH (must exist)
    /// 2) config/assistant.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from_file(&pb);
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from_file(&default_path);
        }
        info!(target: "config", "no assistant config found, using defaults");
        Ok(Self::default())
    }
}
