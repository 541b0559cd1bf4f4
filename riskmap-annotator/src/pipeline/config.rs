use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the annotation pipeline. Defaults reproduce the standard
/// report-processing behavior; a TOML file can override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// Minimum statement length after cleanup; shorter lines are dropped.
    pub min_statement_len: usize,
    /// Case-insensitive markers for boilerplate lines to skip.
    pub boilerplate_markers: Vec<String>,
    /// Partial-ratio score (0-100) a control must reach to count as a fuzzy hit.
    pub fuzzy_threshold: f64,
    /// Cap on ATT&CK technique matches per statement.
    pub max_technique_matches: usize,
    /// Cap on ISO control matches per statement.
    pub max_control_matches: usize,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            min_statement_len: 10,
            boilerplate_markers: vec![
                "routine log line".to_string(),
                "no notable activity recorded".to_string(),
            ],
            fuzzy_threshold: 55.0,
            max_technique_matches: 2,
            max_control_matches: 3,
        }
    }
}

impl AnnotateConfig {
    /// Load overrides from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AnnotateConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            anyhow::bail!(
                "fuzzy_threshold must be between 0 and 100, got {}",
                self.fuzzy_threshold
            );
        }
        if self.min_statement_len == 0 {
            anyhow::bail!("min_statement_len must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_standard_behavior() {
        let config = AnnotateConfig::default();
        assert_eq!(config.min_statement_len, 10);
        assert_eq!(config.fuzzy_threshold, 55.0);
        assert_eq!(config.max_technique_matches, 2);
        assert_eq!(config.max_control_matches, 3);
    }

    #[test]
    fn toml_overrides_are_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fuzzy_threshold = 70.0\n").unwrap();
        let config = AnnotateConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.fuzzy_threshold, 70.0);
        // Untouched fields keep their defaults.
        assert_eq!(config.max_control_matches, 3);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fuzzy_threshold = 250.0\n").unwrap();
        assert!(AnnotateConfig::from_toml_file(file.path()).is_err());
    }
}
