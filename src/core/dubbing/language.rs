//! Language catalog resolution.
//!
//! The provider identifies languages by opaque numeric ids. Callers send loose
//! codes ("hi", "en_US", "Hindi"), so every lookup goes through [`resolve`],
//! which applies a fixed precedence of matching rules against one catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One entry of a provider language catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Opaque provider identifier, unique within its catalog
    pub id: i64,
    /// Human readable name, e.g. "Hindi (India)"
    #[serde(default, rename = "language", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Locale style code, e.g. "hi-in"
    #[serde(default, rename = "short_name", skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
}

impl LanguageEntry {
    pub fn new(id: i64, display_name: Option<&str>, short_code: Option<&str>) -> Self {
        Self {
            id,
            display_name: display_name.map(str::to_string),
            short_code: short_code.map(str::to_string),
        }
    }

    fn normalized_code(&self) -> Option<String> {
        self.short_code.as_deref().map(normalize)
    }

    fn lowercase_name(&self) -> Option<String> {
        self.display_name.as_deref().map(str::to_lowercase)
    }
}

/// Parse a catalog document, skipping entries without an integer `id`.
pub fn parse_catalog(document: Value) -> Option<Vec<LanguageEntry>> {
    let Value::Array(items) = document else {
        return None;
    };

    let total = items.len();
    let entries: Vec<LanguageEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if entries.len() != total {
        debug!(
            skipped = total - entries.len(),
            kept = entries.len(),
            "Skipped malformed language catalog entries"
        );
    }

    Some(entries)
}

/// Normalize a language code: trim, lowercase, underscores to hyphens.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase().replace('_', "-")
}

/// Resolve a requested language against a catalog.
///
/// Matching rules, first hit wins:
/// 1. normalized short code equals the normalized request
/// 2. normalized short code starts with `"<request>-"` ("en" finds "en-us")
/// 3. lowercased display name contains the normalized request
pub fn resolve<'a>(catalog: &'a [LanguageEntry], requested: &str) -> Option<&'a LanguageEntry> {
    let wanted = normalize(requested);
    if wanted.is_empty() {
        return None;
    }

    if let Some(exact) = catalog
        .iter()
        .find(|entry| entry.normalized_code().as_deref() == Some(wanted.as_str()))
    {
        return Some(exact);
    }

    let prefix = format!("{wanted}-");
    if let Some(regional) = catalog.iter().find(|entry| {
        entry
            .normalized_code()
            .is_some_and(|code| code.starts_with(&prefix))
    }) {
        return Some(regional);
    }

    catalog.iter().find(|entry| {
        entry
            .lowercase_name()
            .is_some_and(|name| name.contains(&wanted))
    })
}

/// Pick the source language to use when the caller did not name one.
///
/// Fallback chain: an "auto" short code, a display name mentioning "auto",
/// any English short code, then the first entry. Only an empty catalog yields
/// `None`.
pub fn default_source(catalog: &[LanguageEntry]) -> Option<&LanguageEntry> {
    catalog
        .iter()
        .find(|entry| entry.normalized_code().as_deref() == Some("auto"))
        .or_else(|| {
            catalog
                .iter()
                .find(|entry| entry.lowercase_name().is_some_and(|n| n.contains("auto")))
        })
        .or_else(|| {
            catalog
                .iter()
                .find(|entry| entry.normalized_code().is_some_and(|c| c.starts_with("en")))
        })
        .or_else(|| catalog.first())
}
