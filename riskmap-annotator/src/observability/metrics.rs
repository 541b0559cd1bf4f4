//! Metrics for the annotation pipeline, named per Prometheus conventions.

use std::fmt;
use std::sync::OnceLock;

static HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Until this runs, recorded values
/// go to the `metrics` crate's no-op recorder and are lost.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))?;
    HANDLE.set(handle).ok();
    Ok(())
}

/// Render the current metrics snapshot for in-process inspection.
pub fn snapshot() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

/// Enum representing all metric names used in the system
/// This eliminates magic strings and provides compile-time safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Extract metrics
    ExtractPagesExtracted,
    ExtractDuration,

    // Segment metrics
    SegmentStatementsKept,
    SegmentLinesDropped,

    // Classify metrics
    ClassifyStatementsClassified,

    // Matcher metrics
    MatcherTechniqueMatches,
    MatcherControlMatches,

    // Report metrics
    ReportReportsWritten,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ExtractPagesExtracted => "riskmap_extract_pages_extracted_total",
            MetricName::ExtractDuration => "riskmap_extract_duration_seconds",
            MetricName::SegmentStatementsKept => "riskmap_segment_statements_kept_total",
            MetricName::SegmentLinesDropped => "riskmap_segment_lines_dropped_total",
            MetricName::ClassifyStatementsClassified => "riskmap_classify_statements_total",
            MetricName::MatcherTechniqueMatches => "riskmap_matcher_technique_matches",
            MetricName::MatcherControlMatches => "riskmap_matcher_control_matches",
            MetricName::ReportReportsWritten => "riskmap_report_reports_written_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PDF text extraction metrics
pub mod extract {
    use super::MetricName;

    pub fn pages_extracted(count: usize) {
        let metric_name = MetricName::ExtractPagesExtracted.as_str();
        ::metrics::counter!(metric_name).increment(count as u64);
    }

    pub fn duration(secs: f64) {
        let metric_name = MetricName::ExtractDuration.as_str();
        ::metrics::histogram!(metric_name).record(secs);
    }
}

/// Statement segmentation metrics
pub mod segment {
    use super::MetricName;

    pub fn statements_kept(count: usize) {
        let metric_name = MetricName::SegmentStatementsKept.as_str();
        ::metrics::counter!(metric_name).increment(count as u64);
    }

    pub fn lines_dropped(count: usize) {
        let metric_name = MetricName::SegmentLinesDropped.as_str();
        ::metrics::counter!(metric_name).increment(count as u64);
    }
}

/// STRIDE classification metrics
pub mod classify {
    use super::MetricName;

    pub fn classified(category: &str) {
        ::metrics::counter!(
            MetricName::ClassifyStatementsClassified.as_str(),
            "category" => category.to_string()
        )
        .increment(1);
    }
}

/// Corpus matcher metrics
pub mod matcher {
    use super::MetricName;

    pub fn technique_matches(count: usize) {
        let metric_name = MetricName::MatcherTechniqueMatches.as_str();
        ::metrics::histogram!(metric_name).record(count as f64);
    }

    pub fn control_matches(count: usize) {
        let metric_name = MetricName::MatcherControlMatches.as_str();
        ::metrics::histogram!(metric_name).record(count as f64);
    }
}

/// Report output metrics
pub mod report {
    use super::MetricName;

    pub fn report_written() {
        let metric_name = MetricName::ReportReportsWritten.as_str();
        ::metrics::counter!(metric_name).increment(1);
    }
}
