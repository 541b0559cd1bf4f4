use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use riskmap_core::domain::RiskStatement;

use crate::observability::metrics;
use crate::pipeline::config::AnnotateConfig;

/// Leading list numbering like "12." or "3)" at the start of a line.
static LIST_NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s*").unwrap());

/// Split report text into candidate risk statements: one per line, list
/// numbering stripped, short and boilerplate lines dropped, duplicates
/// removed case-insensitively with the first occurrence kept.
pub fn segment_statements(text: &str, config: &AnnotateConfig) -> Vec<RiskStatement> {
    let mut seen = HashSet::new();
    let mut statements = Vec::new();
    let mut dropped = 0usize;

    for (index, raw_line) in text.lines().enumerate() {
        let line = LIST_NUMBERING.replace(raw_line, "");
        let line = line.trim();

        // Length is measured in characters, not bytes.
        if line.is_empty() || line.chars().count() < config.min_statement_len {
            dropped += 1;
            continue;
        }

        let lowered = line.to_lowercase();
        if config
            .boilerplate_markers
            .iter()
            .any(|marker| lowered.contains(marker.as_str()))
        {
            dropped += 1;
            continue;
        }

        if !seen.insert(lowered) {
            dropped += 1;
            continue;
        }

        statements.push(RiskStatement {
            text: line.to_string(),
            line_number: index + 1,
        });
    }

    debug!(
        "Segmented {} statements ({} lines dropped)",
        statements.len(),
        dropped
    );
    metrics::segment::statements_kept(statements.len());
    metrics::segment::lines_dropped(dropped);

    statements
}
