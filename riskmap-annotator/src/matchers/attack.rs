use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use riskmap_core::domain::{AttackTechnique, TechniqueMatch};

use crate::observability::metrics;

static WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Shortest word considered distinctive enough to match against technique text.
const MIN_WORD_LEN: usize = 5;

/// Lexical matcher over a flattened ATT&CK technique corpus.
pub struct TechniqueMatcher {
    techniques: Vec<AttackTechnique>,
}

impl TechniqueMatcher {
    pub fn new(techniques: Vec<AttackTechnique>) -> Self {
        Self { techniques }
    }

    pub fn technique_count(&self) -> usize {
        self.techniques.len()
    }

    /// Candidate words of a statement: lowercased tokens of at least
    /// [`MIN_WORD_LEN`] characters.
    fn candidate_words(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORDS
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|w| w.chars().count() >= MIN_WORD_LEN)
            .collect()
    }

    /// Match a statement against technique names and descriptions by word
    /// containment, at most `cap` hits in corpus order.
    pub fn lexical_matches(&self, text: &str, cap: usize) -> Vec<TechniqueMatch> {
        let words = Self::candidate_words(text);
        let mut matches = Vec::new();

        for technique in &self.techniques {
            let name = technique.name.to_lowercase();
            let description = technique.description.to_lowercase();
            if words
                .iter()
                .any(|word| name.contains(word.as_str()) || description.contains(word.as_str()))
            {
                matches.push(TechniqueMatch {
                    id: technique.id.clone(),
                    name: technique.name.clone(),
                    url: technique.url.clone(),
                });
                if matches.len() >= cap {
                    break;
                }
            }
        }

        debug!("{} technique matches for statement", matches.len());
        metrics::matcher::technique_matches(matches.len());
        matches
    }

    /// Full-record keyword search used by the `search` subcommand.
    pub fn search(&self, keyword: &str) -> Vec<AttackTechnique> {
        let keyword = keyword.to_lowercase();
        self.techniques
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&keyword)
                    || t.description.to_lowercase().contains(&keyword)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technique(id: &str, name: &str, description: &str) -> AttackTechnique {
        AttackTechnique {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            url: format!("https://attack.mitre.org/techniques/{id}"),
            tactics: vec!["initial-access".to_string()],
            platforms: vec!["Windows".to_string()],
        }
    }

    fn corpus() -> Vec<AttackTechnique> {
        vec![
            technique("T1566", "Phishing", "Adversaries may send phishing messages."),
            technique(
                "T1110",
                "Brute Force",
                "Adversaries may guess passwords via brute force.",
            ),
            technique(
                "T1499",
                "Endpoint Denial of Service",
                "Adversaries may flood services to degrade availability.",
            ),
        ]
    }

    #[test]
    fn matches_by_word_containment() {
        let matcher = TechniqueMatcher::new(corpus());
        let matches = matcher.lexical_matches("A phishing email targeted finance staff", 2);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "T1566");
        assert!(matches[0].url.ends_with("T1566"));
    }

    #[test]
    fn short_words_are_ignored() {
        let matcher = TechniqueMatcher::new(corpus());
        // "may" and "send" are below the length cutoff even though they
        // appear in every description.
        assert!(matcher.lexical_matches("may send mail", 2).is_empty());
    }

    #[test]
    fn word_length_cutoff_counts_characters_not_bytes() {
        let matcher = TechniqueMatcher::new(vec![technique(
            "T1498",
            "Network Denial of Service",
            "Un déni de service distribué sature la cible.",
        )]);
        // "déni" is four characters even though it is five bytes.
        assert!(matcher.lexical_matches("le déni reprend", 2).is_empty());
        // A five-character accented word matches as usual.
        assert_eq!(matcher.lexical_matches("le service est saturé", 2).len(), 1);
    }

    #[test]
    fn matches_are_capped_in_corpus_order() {
        let matcher = TechniqueMatcher::new(corpus());
        // "adversaries" appears in every description.
        let matches = matcher.lexical_matches("multiple adversaries were active", 2);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "T1566");
        assert_eq!(matches[1].id, "T1110");
    }

    #[test]
    fn search_hits_name_and_description() {
        let matcher = TechniqueMatcher::new(corpus());
        let by_name = matcher.search("brute");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "T1110");

        let by_description = matcher.search("flood");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, "T1499");

        assert!(matcher.search("nonexistent").is_empty());
    }
}
