use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::common::error::{Result, RiskmapError};
use crate::domain::StrideCategory;

/// Ordered STRIDE keyword rules: each category with the phrases that claim
/// a statement for it.
pub type StrideRules = Vec<(StrideCategory, Vec<String>)>;

/// Load a STRIDE keyword map from JSON (`{"Spoofing": ["fake login", ...], ...}`)
/// and order its rules canonically. Unknown category labels are rejected.
pub fn load_keyword_map<P: AsRef<Path>>(path: P) -> Result<StrideRules> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RiskmapError::Corpus {
        message: format!("Failed to read STRIDE keyword map {}: {}", path.display(), e),
    })?;
    let map: HashMap<String, Vec<String>> =
        serde_json::from_str(&content).map_err(|e| RiskmapError::Corpus {
            message: format!("Failed to parse STRIDE keyword map {}: {}", path.display(), e),
        })?;

    for label in map.keys() {
        if StrideCategory::from_label(label).is_none() {
            return Err(RiskmapError::Corpus {
                message: format!("Unknown STRIDE category in keyword map: {label}"),
            });
        }
    }

    let mut rules = Vec::new();
    for category in StrideCategory::CLASSIFICATION_ORDER {
        if let Some(keywords) = map.get(category.label()) {
            let keywords = keywords.iter().map(|k| k.to_lowercase()).collect();
            rules.push((category, keywords));
        }
    }

    info!("Loaded STRIDE keyword map with {} categories", rules.len());
    Ok(rules)
}
