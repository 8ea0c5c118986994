// src/config/mod.rs
pub mod assistant;

pub use assistant::{AssistantConfig, CatalogSection, RankingSection};
