use tracing::debug;

use riskmap_core::corpus::stride::StrideRules;
use riskmap_core::domain::StrideCategory;

use crate::observability::metrics;

/// Keyword-containment STRIDE classifier. Rules are evaluated in canonical
/// category order; the first category with a keyword contained in the
/// lowercased statement wins.
pub struct StrideClassifier {
    rules: StrideRules,
}

impl StrideClassifier {
    /// Classifier with the built-in keyword lists.
    pub fn builtin() -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        let rules = vec![
            (
                StrideCategory::Spoofing,
                owned(&[
                    "fake login",
                    "impersonate",
                    "spoof",
                    "forged",
                    "masquerade",
                    "unauthorized access",
                    "credential theft",
                    "phishing",
                    "identity theft",
                    "social engineering",
                    "fake portal",
                ]),
            ),
            (
                StrideCategory::Tampering,
                owned(&[
                    "modify",
                    "tamper",
                    "overwrite",
                    "unauthorized change",
                    "alter",
                    "code injection",
                    "data manipulation",
                    "file corruption",
                    "configuration change",
                    "injected payload",
                ]),
            ),
            (
                StrideCategory::Repudiation,
                owned(&[
                    "deny",
                    "repudiation",
                    "non-repudiation",
                    "erase logs",
                    "deleted logs",
                    "log tampering",
                    "activity denial",
                    "unaudited access",
                    "no logging",
                    "untracked changes",
                ]),
            ),
            (
                StrideCategory::InformationDisclosure,
                owned(&[
                    "leak",
                    "expose",
                    "sensitive data",
                    "unauthorized view",
                    "unencrypted",
                    "data breach",
                    "pii exposure",
                    "information theft",
                    "confidential",
                    "unprotected",
                ]),
            ),
            (
                StrideCategory::DenialOfService,
                owned(&[
                    "denial",
                    "unavailable",
                    "slow",
                    "ddos",
                    "flood",
                    "service disruption",
                    "downtime",
                    "crash",
                    "overload",
                    "system failure",
                    "resource exhaustion",
                ]),
            ),
            (
                StrideCategory::ElevationOfPrivilege,
                owned(&[
                    "admin access",
                    "root access",
                    "privilege escalation",
                    "elevation of privilege",
                    "bypass authentication",
                    "gain control",
                    "escalated rights",
                    "superuser",
                    "unauthorized admin",
                ]),
            ),
        ];
        Self { rules }
    }

    /// Classifier driven by a loaded keyword map instead of the built-in lists.
    pub fn from_rules(rules: StrideRules) -> Self {
        Self { rules }
    }

    pub fn classify(&self, text: &str) -> StrideCategory {
        let lowered = text.to_lowercase();
        for (category, keywords) in &self.rules {
            if keywords.iter().any(|keyword| lowered.contains(keyword.as_str())) {
                debug!("Classified as {}: {}", category, text);
                metrics::classify::classified(category.label());
                return *category;
            }
        }
        metrics::classify::classified(StrideCategory::Uncategorized.label());
        StrideCategory::Uncategorized
    }
}
