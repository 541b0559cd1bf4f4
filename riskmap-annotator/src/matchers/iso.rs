use tracing::debug;

use riskmap_core::domain::{ControlMatch, ControlScore, IsoControl};

use crate::observability::metrics;
use crate::pipeline::similarity::Similarity;

/// Hybrid fuzzy + keyword matcher over the flattened ISO 27001 control list.
pub struct ControlMatcher {
    controls: Vec<IsoControl>,
}

impl ControlMatcher {
    pub fn new(controls: Vec<IsoControl>) -> Self {
        Self { controls }
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// Match a statement against controls: fuzzy partial-ratio hits at or
    /// above `threshold` ranked by score, then keyword-containment hits,
    /// deduplicated in order and capped at `cap`.
    pub fn hybrid_matches(&self, text: &str, threshold: f64, cap: usize) -> Vec<ControlMatch> {
        let lowered = text.to_lowercase();

        let mut fuzzy: Vec<(f64, String)> = Vec::new();
        for control in &self.controls {
            let score = Similarity::partial_ratio(&lowered, &control.fulltext);
            if score >= threshold {
                fuzzy.push((score, control.reference()));
            }
        }
        // Stable sort: equal scores keep corpus order.
        fuzzy.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut references: Vec<String> = fuzzy.into_iter().map(|(_, r)| r).collect();
        for control in &self.controls {
            if control
                .keywords
                .iter()
                .any(|keyword| lowered.contains(keyword.as_str()))
            {
                references.push(control.reference());
            }
        }

        let mut matches = Vec::new();
        for reference in references {
            if matches.iter().any(|m: &ControlMatch| m.reference == reference) {
                continue;
            }
            matches.push(ControlMatch { reference });
            if matches.len() >= cap {
                break;
            }
        }

        debug!("{} control matches for statement", matches.len());
        metrics::matcher::control_matches(matches.len());
        matches
    }

    /// Rank all controls against a query by token-frequency cosine over
    /// their titles and return the top `k` with scores.
    pub fn top_k_by_similarity(&self, text: &str, k: usize) -> Vec<ControlScore> {
        let mut scored: Vec<ControlScore> = self
            .controls
            .iter()
            .map(|control| ControlScore {
                control_id: control.id.clone(),
                control_title: control.title.clone(),
                section: control.section.clone(),
                score: Similarity::cosine_similarity(text, &control.title),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(id: &str, title: &str, section: &str) -> IsoControl {
        let keywords = title
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.len() > 3 && !["the", "of", "and", "for"].contains(w))
            .map(|w| w.to_string())
            .collect();
        IsoControl {
            id: id.to_string(),
            title: title.to_string(),
            section: section.to_string(),
            keywords,
            fulltext: format!("{id} {title}").to_lowercase(),
        }
    }

    fn corpus() -> Vec<IsoControl> {
        vec![
            control("5.17", "Authentication information", "Organizational controls"),
            control("8.15", "Logging", "Technological controls"),
            control("8.16", "Monitoring activities", "Technological controls"),
        ]
    }

    #[test]
    fn keyword_hit_matches_control() {
        let matcher = ControlMatcher::new(corpus());
        let matches = matcher.hybrid_matches(
            "No logging existed for administrative actions",
            55.0,
            3,
        );
        assert!(matches
            .iter()
            .any(|m| m.reference == "8.15 - Logging"));
    }

    #[test]
    fn fuzzy_hit_matches_embedded_control_text() {
        let matcher = ControlMatcher::new(corpus());
        // The control fulltext "8.16 monitoring activities" appears nearly
        // verbatim, so the fuzzy pass alone should claim it.
        let matches = matcher.hybrid_matches(
            "Gaps were found in 8.16 monitoring activities coverage",
            55.0,
            3,
        );
        assert_eq!(matches[0].reference, "8.16 - Monitoring activities");
    }

    #[test]
    fn tied_fuzzy_scores_keep_corpus_order() {
        let matcher = ControlMatcher::new(corpus());
        // Both fulltexts appear verbatim, so both score 100 in the fuzzy
        // pass; the tie resolves to corpus order.
        let matches = matcher.hybrid_matches(
            "Audit of 8.16 monitoring activities and 5.17 authentication information",
            55.0,
            3,
        );
        assert_eq!(matches[0].reference, "5.17 - Authentication information");
        assert_eq!(matches[1].reference, "8.16 - Monitoring activities");
    }

    #[test]
    fn matches_are_deduplicated_and_capped() {
        let matcher = ControlMatcher::new(corpus());
        // Hits both the fuzzy pass and the keyword pass for the same control.
        let matches = matcher.hybrid_matches(
            "Review of 8.15 logging and monitoring activities and authentication information",
            55.0,
            2,
        );
        assert!(matches.len() <= 2);
        let mut seen = std::collections::HashSet::new();
        for m in &matches {
            assert!(seen.insert(m.reference.clone()), "duplicate: {}", m.reference);
        }
    }

    #[test]
    fn unrelated_statement_matches_nothing() {
        let matcher = ControlMatcher::new(corpus());
        let matches = matcher.hybrid_matches("zzzz qqqq xxxx vvvv wwww", 55.0, 3);
        assert!(matches.is_empty());
    }

    #[test]
    fn top_k_ranks_by_title_overlap() {
        let matcher = ControlMatcher::new(corpus());
        let scores = matcher.top_k_by_similarity("monitoring of privileged activities", 2);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].control_id, "8.16");
        assert!(scores[0].score > scores[1].score);
        assert_eq!(scores[0].section, "Technological controls");
    }
}
