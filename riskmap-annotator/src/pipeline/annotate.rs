use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

use riskmap_core::common::error::Result;
use riskmap_core::domain::{AnnotatedRisk, AnnotationReport, RiskStatement};

use crate::classify::StrideClassifier;
use crate::matchers::{ControlMatcher, TechniqueMatcher};
use crate::observability::metrics;
use crate::pipeline::config::AnnotateConfig;
use crate::pipeline::extract;
use crate::pipeline::segment;

/// Runs the full annotation pipeline: extract, segment, classify, match.
pub struct Annotator {
    classifier: StrideClassifier,
    technique_matcher: TechniqueMatcher,
    control_matcher: ControlMatcher,
    config: AnnotateConfig,
}

impl Annotator {
    pub fn new(
        classifier: StrideClassifier,
        technique_matcher: TechniqueMatcher,
        control_matcher: ControlMatcher,
        config: AnnotateConfig,
    ) -> Self {
        Self {
            classifier,
            technique_matcher,
            control_matcher,
            config,
        }
    }

    /// Annotate a PDF risk report.
    #[instrument(skip_all, fields(path = %pdf_path.as_ref().display()))]
    pub fn annotate_pdf<P: AsRef<Path>>(&self, pdf_path: P) -> Result<AnnotationReport> {
        let pdf_path = pdf_path.as_ref();
        info!("Extracting text from {}", pdf_path.display());
        let extracted = extract::extract_text_from_pdf(pdf_path)?;
        info!("Extracted {} pages", extracted.page_count);

        Ok(self.annotate_text(
            &extracted.text,
            extracted.page_count,
            &pdf_path.to_string_lossy(),
        ))
    }

    /// Annotate already-extracted report text.
    pub fn annotate_text(&self, text: &str, page_count: usize, source: &str) -> AnnotationReport {
        let statements = segment::segment_statements(text, &self.config);
        info!("Segmented {} candidate risk statements", statements.len());

        let risks: Vec<AnnotatedRisk> = statements
            .iter()
            .map(|statement| self.annotate_statement(statement))
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let text_sha256 = hex::encode(hasher.finalize());

        info!("Annotated {} risk statements from {}", risks.len(), source);
        AnnotationReport {
            source_path: source.to_string(),
            text_sha256,
            page_count,
            statement_count: risks.len(),
            risks,
            annotated_at: Utc::now(),
        }
    }

    fn annotate_statement(&self, statement: &RiskStatement) -> AnnotatedRisk {
        let stride_category = self.classifier.classify(&statement.text);
        let mitre_matches = self
            .technique_matcher
            .lexical_matches(&statement.text, self.config.max_technique_matches);
        let iso_controls = self.control_matcher.hybrid_matches(
            &statement.text,
            self.config.fuzzy_threshold,
            self.config.max_control_matches,
        );

        AnnotatedRisk {
            id: Uuid::new_v4(),
            risk_text: statement.text.clone(),
            line_number: statement.line_number,
            stride_category,
            mitre_matches,
            iso_controls,
        }
    }

    /// Persist a report as pretty JSON under `output_dir` with a
    /// timestamped filename, returning the written path.
    pub fn persist_to_json(report: &AnnotationReport, output_dir: &str) -> Result<String> {
        fs::create_dir_all(output_dir)?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("risk_annotations_{timestamp}.json");
        let filepath = Path::new(output_dir).join(&filename);

        let json_content = serde_json::to_string_pretty(report)?;
        fs::write(&filepath, json_content)?;

        metrics::report::report_written();
        Ok(filepath.to_string_lossy().to_string())
    }
}
