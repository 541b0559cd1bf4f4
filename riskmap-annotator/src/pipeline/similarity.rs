use std::collections::HashMap;

/// String similarity scoring for control and technique matching
pub struct Similarity;

impl Similarity {
    /// Levenshtein distance between two strings
    pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
        let chars1: Vec<char> = s1.chars().collect();
        let chars2: Vec<char> = s2.chars().collect();
        Self::levenshtein_chars(&chars1, &chars2)
    }

    fn levenshtein_chars(chars1: &[char], chars2: &[char]) -> usize {
        let len1 = chars1.len();
        let len2 = chars2.len();

        let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

        for i in 0..=len1 {
            matrix[i][0] = i;
        }
        for j in 0..=len2 {
            matrix[0][j] = j;
        }

        for i in 1..=len1 {
            for j in 1..=len2 {
                let cost = if chars1[i - 1] == chars2[j - 1] { 0 } else { 1 };
                matrix[i][j] = (matrix[i - 1][j] + 1)
                    .min(matrix[i][j - 1] + 1)
                    .min(matrix[i - 1][j - 1] + cost);
            }
        }

        matrix[len1][len2]
    }

    /// Normalized similarity ratio on a 0-100 scale
    pub fn ratio(s1: &str, s2: &str) -> f64 {
        let chars1: Vec<char> = s1.chars().collect();
        let chars2: Vec<char> = s2.chars().collect();
        Self::ratio_chars(&chars1, &chars2)
    }

    fn ratio_chars(chars1: &[char], chars2: &[char]) -> f64 {
        if chars1.is_empty() && chars2.is_empty() {
            return 100.0;
        }
        let max_len = chars1.len().max(chars2.len());
        if max_len == 0 {
            return 100.0;
        }
        let distance = Self::levenshtein_chars(chars1, chars2);
        (1.0 - distance as f64 / max_len as f64) * 100.0
    }

    /// Best ratio of the shorter string against every same-length window of
    /// the longer one, 0-100. Empty input scores 0 so it can never clear a
    /// match threshold.
    pub fn partial_ratio(s1: &str, s2: &str) -> f64 {
        if s1.is_empty() || s2.is_empty() {
            return 0.0;
        }

        let chars1: Vec<char> = s1.chars().collect();
        let chars2: Vec<char> = s2.chars().collect();
        let (shorter, longer) = if chars1.len() <= chars2.len() {
            (&chars1, &chars2)
        } else {
            (&chars2, &chars1)
        };

        if shorter.len() == longer.len() {
            return Self::ratio_chars(shorter, longer);
        }

        let mut best = 0.0f64;
        for start in 0..=(longer.len() - shorter.len()) {
            let window = &longer[start..start + shorter.len()];
            let score = Self::ratio_chars(shorter, window);
            if score > best {
                best = score;
                if best >= 100.0 {
                    break;
                }
            }
        }
        best
    }

    /// Lowercased word-frequency vector of a text
    pub fn token_frequencies(text: &str) -> HashMap<String, f64> {
        let mut frequencies = HashMap::new();
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            *frequencies.entry(token.to_string()).or_insert(0.0) += 1.0;
        }
        frequencies
    }

    /// Cosine similarity between the token-frequency vectors of two texts,
    /// in [0, 1]
    pub fn cosine_similarity(s1: &str, s2: &str) -> f64 {
        let freq1 = Self::token_frequencies(s1);
        let freq2 = Self::token_frequencies(s2);

        if freq1.is_empty() || freq2.is_empty() {
            return 0.0;
        }

        let dot: f64 = freq1
            .iter()
            .filter_map(|(token, count)| freq2.get(token).map(|other| count * other))
            .sum();
        let norm1: f64 = freq1.values().map(|c| c * c).sum::<f64>().sqrt();
        let norm2: f64 = freq2.values().map(|c| c * c).sum::<f64>().sqrt();

        dot / (norm1 * norm2)
    }
}
