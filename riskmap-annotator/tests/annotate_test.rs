use anyhow::Result;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

use riskmap_annotator::classify::StrideClassifier;
use riskmap_annotator::matchers::{ControlMatcher, TechniqueMatcher};
use riskmap_annotator::pipeline::{AnnotateConfig, Annotator};
use riskmap_annotator::report;
use riskmap_annotator::StrideCategory;
use riskmap_core::corpus::{attack, iso, stride};

fn write_attack_bundle(dir: &std::path::Path) -> std::path::PathBuf {
    let bundle = json!({
        "objects": [
            {
                "type": "attack-pattern",
                "name": "Phishing",
                "description": "Adversaries may send phishing messages to gain access to victim systems.",
                "external_references": [
                    {"external_id": "T1566", "url": "https://attack.mitre.org/techniques/T1566"}
                ],
                "kill_chain_phases": [{"kill_chain_name": "mitre-attack", "phase_name": "initial-access"}],
                "x_mitre_platforms": ["Linux", "macOS", "Windows"]
            },
            {
                "type": "attack-pattern",
                "name": "Network Denial of Service",
                "description": "Adversaries may flood a target with network traffic.",
                "external_references": [
                    {"external_id": "T1498", "url": "https://attack.mitre.org/techniques/T1498"}
                ]
            },
            {
                "type": "course-of-action",
                "name": "User Training"
            }
        ]
    });
    let path = dir.join("enterprise-attack.json");
    fs::write(&path, bundle.to_string()).unwrap();
    path
}

fn write_iso_controls(dir: &std::path::Path) -> std::path::PathBuf {
    let controls = json!([
        {
            "section": "Organizational controls",
            "controls": [
                {"id": "5.17", "title": "Authentication information"}
            ]
        },
        {
            "section": "Technological controls",
            "controls": [
                {"id": "8.15", "title": "Logging"},
                {"id": "8.16", "title": "Monitoring activities"}
            ]
        }
    ]);
    let path = dir.join("iso_27001_2022_controls.json");
    fs::write(&path, controls.to_string()).unwrap();
    path
}

fn build_annotator(dir: &std::path::Path) -> Result<Annotator> {
    let techniques = attack::load_techniques(write_attack_bundle(dir))?;
    let controls = iso::load_controls(write_iso_controls(dir))?;
    Ok(Annotator::new(
        StrideClassifier::builtin(),
        TechniqueMatcher::new(techniques),
        ControlMatcher::new(controls),
        AnnotateConfig::default(),
    ))
}

#[test]
fn annotates_report_text_against_loaded_corpora() -> Result<()> {
    let temp_dir = tempdir()?;
    let annotator = build_annotator(temp_dir.path())?;

    let text = "\
1. Phishing email led users to an attacker-controlled portal
2. Routine log line: scheduled backup completed
3. No logging existed for privileged account activity
4. Phishing email led users to an attacker-controlled portal
";

    let annotation = annotator.annotate_text(text, 1, "fixture");

    // Boilerplate and the duplicate statement are dropped.
    assert_eq!(annotation.statement_count, 2);

    let phishing = &annotation.risks[0];
    assert_eq!(phishing.stride_category, StrideCategory::Spoofing);
    assert_eq!(phishing.mitre_matches.len(), 1);
    assert_eq!(phishing.mitre_matches[0].id, "T1566");

    let logging = &annotation.risks[1];
    assert_eq!(logging.stride_category, StrideCategory::Repudiation);
    assert!(logging
        .iso_controls
        .iter()
        .any(|c| c.reference == "8.15 - Logging"));

    Ok(())
}

#[test]
fn rendered_report_lists_all_annotations() -> Result<()> {
    let temp_dir = tempdir()?;
    let annotator = build_annotator(temp_dir.path())?;

    let annotation = annotator.annotate_text(
        "A flood of requests made the service unavailable",
        1,
        "fixture",
    );
    let rendered = report::render_text(&annotation);

    assert!(rendered.contains("STRIDE: Denial of Service"));
    assert!(rendered.contains("Network Denial of Service (T1498)"));
    Ok(())
}

#[test]
fn persisted_report_round_trips_through_json() -> Result<()> {
    let temp_dir = tempdir()?;
    let annotator = build_annotator(temp_dir.path())?;
    let output_dir = temp_dir.path().join("out");

    let annotation =
        annotator.annotate_text("Credential theft via a fake login page", 1, "fixture");
    let path = Annotator::persist_to_json(&annotation, output_dir.to_str().unwrap())?;

    let parsed: riskmap_annotator::AnnotationReport =
        serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(parsed.statement_count, 1);
    assert_eq!(parsed.risks[0].stride_category, StrideCategory::Spoofing);
    assert_eq!(parsed.text_sha256, annotation.text_sha256);
    Ok(())
}

#[test]
fn keyword_map_overrides_builtin_classifier() -> Result<()> {
    let temp_dir = tempdir()?;
    let map_path = temp_dir.path().join("stride_keywords.json");
    fs::write(
        &map_path,
        json!({
            "Tampering": ["firmware swap"],
            "Denial of Service": ["meltdown"]
        })
        .to_string(),
    )?;

    let classifier = StrideClassifier::from_rules(stride::load_keyword_map(&map_path)?);
    assert_eq!(
        classifier.classify("Unexpected firmware swap on edge devices"),
        StrideCategory::Tampering
    );
    // Built-in keywords no longer classify once a map is supplied.
    assert_eq!(
        classifier.classify("Phishing email reported by staff"),
        StrideCategory::Uncategorized
    );
    Ok(())
}

#[test]
fn technique_search_returns_full_records() -> Result<()> {
    let temp_dir = tempdir()?;
    let techniques = attack::load_techniques(write_attack_bundle(temp_dir.path()))?;
    let matcher = TechniqueMatcher::new(techniques);

    let hits = matcher.search("flood");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "T1498");

    let rendered = report::render_search_hits(&hits);
    assert!(rendered.contains("Found 1 matching techniques"));
    assert!(rendered.contains("Network Denial of Service (T1498)"));
    Ok(())
}

#[test]
fn bundle_filtering_keeps_attack_patterns_only() -> Result<()> {
    let temp_dir = tempdir()?;
    let bundle_path = write_attack_bundle(temp_dir.path());

    let patterns = attack::filter_attack_patterns(&bundle_path)?;
    assert_eq!(patterns.len(), 2);
    assert!(patterns.iter().all(|p| p["type"] == "attack-pattern"));
    Ok(())
}

#[test]
fn control_mapping_scores_descend() -> Result<()> {
    let temp_dir = tempdir()?;
    let controls = iso::load_controls(write_iso_controls(temp_dir.path()))?;
    let matcher = ControlMatcher::new(controls);

    let scores = matcher.top_k_by_similarity("monitoring of user activities", 3);
    assert_eq!(scores.len(), 3);
    assert_eq!(scores[0].control_id, "8.16");
    assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
    Ok(())
}
