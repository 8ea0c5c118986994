//! Tag normalization shared by the catalog, preferences and learner.
//!
//! Tags are compared case-insensitively and without surrounding whitespace,
//! so `" Vegan "` and `"vegan"` are the same tag everywhere in the crate.

use std::collections::BTreeSet;

/// Normalize a raw tag: trim + ASCII lowercase. Blank input yields `None`.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_ascii_lowercase())
    }
}

/// Normalize a list into a set, silently dropping blank entries.
pub fn normalize_set<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|s| normalize_tag(s.as_ref()))
        .collect()
}
