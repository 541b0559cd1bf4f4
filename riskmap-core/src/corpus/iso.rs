use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::common::error::{Result, RiskmapError};
use crate::domain::IsoControl;

/// Words too generic to serve as control-title keywords.
const STOPWORDS: [&str; 14] = [
    "the", "of", "and", "or", "to", "in", "for", "use", "with", "on", "by", "a", "an", "at",
];

#[derive(Debug, Deserialize)]
struct IsoSection {
    section: String,
    #[serde(default)]
    controls: Vec<IsoControlEntry>,
}

#[derive(Debug, Deserialize)]
struct IsoControlEntry {
    id: String,
    title: String,
}

/// Derive containment keywords from a control title: lowercase, strip
/// punctuation, drop stopwords and words of 3 characters or fewer.
fn title_keywords(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .split_whitespace()
        .filter(|word| word.len() > 3 && !STOPWORDS.contains(word))
        .map(|word| word.to_string())
        .collect()
}

/// Load a sectioned ISO 27001:2022 control list and flatten it into
/// matchable control records.
pub fn load_controls<P: AsRef<Path>>(path: P) -> Result<Vec<IsoControl>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RiskmapError::Corpus {
        message: format!("Failed to read ISO control list {}: {}", path.display(), e),
    })?;
    let sections: Vec<IsoSection> =
        serde_json::from_str(&content).map_err(|e| RiskmapError::Corpus {
            message: format!("Failed to parse ISO control list {}: {}", path.display(), e),
        })?;

    let mut controls = Vec::new();
    for section in sections {
        for entry in section.controls {
            let keywords = title_keywords(&entry.title);
            let fulltext = format!("{} {}", entry.id, entry.title).to_lowercase();
            controls.push(IsoControl {
                id: entry.id,
                title: entry.title,
                section: section.section.clone(),
                keywords,
                fulltext,
            });
        }
    }

    info!("Loaded {} ISO 27001 controls", controls.len());
    Ok(controls)
}
