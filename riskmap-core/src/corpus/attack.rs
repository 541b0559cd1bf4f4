use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::common::error::{Result, RiskmapError};
use crate::domain::AttackTechnique;

/// STIX object type carrying technique definitions in an ATT&CK bundle.
const ATTACK_PATTERN_TYPE: &str = "attack-pattern";

#[derive(Debug, Deserialize)]
struct StixBundle {
    objects: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StixAttackPattern {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    external_references: Vec<ExternalReference>,
    #[serde(default)]
    kill_chain_phases: Vec<KillChainPhase>,
    #[serde(default, rename = "x_mitre_platforms")]
    platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalReference {
    #[serde(default)]
    external_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KillChainPhase {
    #[serde(default)]
    phase_name: String,
}

fn is_attack_pattern(object: &serde_json::Value) -> bool {
    object.get("type").and_then(|t| t.as_str()) == Some(ATTACK_PATTERN_TYPE)
}

fn flatten(pattern: StixAttackPattern) -> AttackTechnique {
    // The ATT&CK id and public url live on the first external reference.
    let first_ref = pattern.external_references.first();
    AttackTechnique {
        id: first_ref
            .and_then(|r| r.external_id.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        name: pattern.name,
        description: pattern.description,
        url: first_ref
            .and_then(|r| r.url.clone())
            .unwrap_or_else(|| "#".to_string()),
        tactics: pattern
            .kill_chain_phases
            .into_iter()
            .map(|p| p.phase_name)
            .collect(),
        platforms: pattern.platforms,
    }
}

/// Load an ATT&CK STIX bundle and flatten its attack-pattern objects into
/// technique records, in bundle order.
pub fn load_techniques<P: AsRef<Path>>(path: P) -> Result<Vec<AttackTechnique>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RiskmapError::Corpus {
        message: format!("Failed to read ATT&CK bundle {}: {}", path.display(), e),
    })?;
    let bundle: StixBundle = serde_json::from_str(&content).map_err(|e| RiskmapError::Corpus {
        message: format!("Failed to parse ATT&CK bundle {}: {}", path.display(), e),
    })?;

    let mut techniques = Vec::new();
    for object in bundle.objects {
        if !is_attack_pattern(&object) {
            continue;
        }
        let pattern: StixAttackPattern = serde_json::from_value(object)?;
        techniques.push(flatten(pattern));
    }

    info!("Loaded {} ATT&CK techniques", techniques.len());
    Ok(techniques)
}

/// Reduce a full STIX bundle to its raw attack-pattern objects, preserving
/// their original JSON shape.
pub fn filter_attack_patterns<P: AsRef<Path>>(path: P) -> Result<Vec<serde_json::Value>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RiskmapError::Corpus {
        message: format!("Failed to read ATT&CK bundle {}: {}", path.display(), e),
    })?;
    let bundle: StixBundle = serde_json::from_str(&content).map_err(|e| RiskmapError::Corpus {
        message: format!("Failed to parse ATT&CK bundle {}: {}", path.display(), e),
    })?;

    Ok(bundle.objects.into_iter().filter(is_attack_pattern).collect())
}
