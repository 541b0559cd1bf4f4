use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// STRIDE threat categories, plus a fallback for statements no rule claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrideCategory {
    Spoofing,
    Tampering,
    Repudiation,
    #[serde(rename = "Information Disclosure")]
    InformationDisclosure,
    #[serde(rename = "Denial of Service")]
    DenialOfService,
    #[serde(rename = "Elevation of Privilege")]
    ElevationOfPrivilege,
    Uncategorized,
}

impl StrideCategory {
    /// Canonical evaluation order for keyword classification.
    pub const CLASSIFICATION_ORDER: [StrideCategory; 6] = [
        StrideCategory::Spoofing,
        StrideCategory::Tampering,
        StrideCategory::Repudiation,
        StrideCategory::InformationDisclosure,
        StrideCategory::DenialOfService,
        StrideCategory::ElevationOfPrivilege,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StrideCategory::Spoofing => "Spoofing",
            StrideCategory::Tampering => "Tampering",
            StrideCategory::Repudiation => "Repudiation",
            StrideCategory::InformationDisclosure => "Information Disclosure",
            StrideCategory::DenialOfService => "Denial of Service",
            StrideCategory::ElevationOfPrivilege => "Elevation of Privilege",
            StrideCategory::Uncategorized => "Uncategorized",
        }
    }

    pub fn from_label(label: &str) -> Option<StrideCategory> {
        match label {
            "Spoofing" => Some(StrideCategory::Spoofing),
            "Tampering" => Some(StrideCategory::Tampering),
            "Repudiation" => Some(StrideCategory::Repudiation),
            "Information Disclosure" => Some(StrideCategory::InformationDisclosure),
            "Denial of Service" => Some(StrideCategory::DenialOfService),
            "Elevation of Privilege" => Some(StrideCategory::ElevationOfPrivilege),
            "Uncategorized" => Some(StrideCategory::Uncategorized),
            _ => None,
        }
    }
}

impl std::fmt::Display for StrideCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A MITRE ATT&CK technique flattened from its STIX attack-pattern object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackTechnique {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub tactics: Vec<String>,
    pub platforms: Vec<String>,
}

/// An ISO 27001:2022 control flattened from its section, with derived
/// title keywords for containment matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsoControl {
    pub id: String,
    pub title: String,
    pub section: String,
    pub keywords: Vec<String>,
    pub fulltext: String,
}

impl IsoControl {
    /// Display form used in matcher output, e.g. "5.1 - Policies for information security".
    pub fn reference(&self) -> String {
        format!("{} - {}", self.id, self.title)
    }
}

/// A cleaned candidate risk statement extracted from report text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskStatement {
    pub text: String,
    pub line_number: usize,
}

/// A technique reference attached to a risk statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueMatch {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// A control reference attached to a risk statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlMatch {
    pub reference: String,
}

/// A scored control from similarity-based mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlScore {
    pub control_id: String,
    pub control_title: String,
    pub section: String,
    pub score: f64,
}

/// A risk statement with all of its annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedRisk {
    pub id: Uuid,
    pub risk_text: String,
    pub line_number: usize,
    pub stride_category: StrideCategory,
    pub mitre_matches: Vec<TechniqueMatch>,
    pub iso_controls: Vec<ControlMatch>,
}

/// A full annotation run over one report, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub source_path: String,
    pub text_sha256: String,
    pub page_count: usize,
    pub statement_count: usize,
    pub risks: Vec<AnnotatedRisk>,
    pub annotated_at: DateTime<Utc>,
}
