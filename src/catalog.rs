//! # Catalog
//! Loads the product catalog from a JSON array and turns every record into an
//! immutable [`Item`].
//!
//! A record that is missing `price` or `sustainability_tags` (or carries the wrong
//! type for them) is skipped and reported; one bad record never aborts the load.
//!
//! Path resolution for [`load_catalog_default`]:
//! 1) `$ASSISTANT_CATALOG_PATH` (must exist)
//! 2) the path passed by the caller (usually from `AssistantConfig`)
//! 3) `config/products.json`

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::tags::normalize_set;

pub const ENV_CATALOG_PATH: &str = "ASSISTANT_CATALOG_PATH";
pub const DEFAULT_CATALOG_PATH: &str = "config/products.json";

/// A product as the ranking core sees it. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub price: f32,
    pub description: String,
    pub sustainability_tags: BTreeSet<String>,
}

impl Item {
    /// Build an item with normalized tags. Handy for tests and in-code catalogs.
    pub fn new<I, S>(id: &str, name: &str, price: f32, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            brand: String::new(),
            price,
            description: String::new(),
            sustainability_tags: normalize_set(tags),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.sustainability_tags.contains(tag)
    }
}

/// Why a catalog record could not become an [`Item`].
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("price must be a finite number >= 0 (got {0})")]
    InvalidPrice(f32),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A record that was left out of the catalog, with its position in the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub reason: RecordError,
}

/// Loaded catalog: the usable items (in file order) and the skipped records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub items: Vec<Item>,
    pub skipped: Vec<SkippedRecord>,
}

impl Catalog {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items,
            skipped: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordId {
    Num(u64),
    Text(String),
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            RecordId::Num(n) => n.to_string(),
            RecordId::Text(s) => s,
        }
    }
}

// Wire shape: everything optional so we can report exactly what is missing.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    price: Option<f32>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    sustainability_tags: Option<Vec<String>>,
}

/// Parse a catalog from JSON text. The top level must be an array.
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(json).context("catalog must be a JSON array of product records")?;

    let mut catalog = Catalog::default();
    for (index, value) in records.into_iter().enumerate() {
        let id_hint = value
            .get("id")
            .and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        match record_to_item(index, value) {
            Ok(item) => catalog.items.push(item),
            Err(reason) => {
                warn!(target: "catalog", index, id = ?id_hint, %reason, "skipping catalog record");
                catalog.skipped.push(SkippedRecord {
                    index,
                    id: id_hint,
                    reason,
                });
            }
        }
    }
    Ok(catalog)
}

fn record_to_item(index: usize, value: serde_json::Value) -> Result<Item, RecordError> {
    if !value.is_object() {
        return Err(RecordError::NotAnObject);
    }
    let raw: RawRecord =
        serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))?;

    let price = raw.price.ok_or(RecordError::MissingField("price"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(RecordError::InvalidPrice(price));
    }
    let tags = raw
        .sustainability_tags
        .ok_or(RecordError::MissingField("sustainability_tags"))?;

    Ok(Item {
        id: raw
            .id
            .map(RecordId::into_string)
            .unwrap_or_else(|| format!("item-{index}")),
        name: raw.name.unwrap_or_default(),
        brand: raw.brand.unwrap_or_default(),
        price,
        description: raw.description.unwrap_or_default(),
        sustainability_tags: normalize_set(tags),
    })
}

/// Load a catalog from an explicit path.
pub fn load_catalog_from(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading catalog from {}", path.display()))?;
    let catalog = parse_catalog(&content)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    info!(
        target: "catalog",
        path = %path.display(),
        items = catalog.items.len(),
        skipped = catalog.skipped.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Load using env var + configured path + fallback (see module docs).
pub fn load_catalog_default(configured: Option<&Path>) -> Result<Catalog> {
    if let Ok(p) = std::env::var(ENV_CATALOG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CATALOG_PATH} points to non-existent path"));
        }
        return load_catalog_from(&pb);
    }
    let path = configured
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
    load_catalog_from(&path)
}
