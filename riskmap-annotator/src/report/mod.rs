use riskmap_core::domain::{AnnotationReport, AttackTechnique, ControlScore};

/// Render an annotation report in the plain-text layout printed to stdout.
pub fn render_text(report: &AnnotationReport) -> String {
    let mut out = String::new();

    for risk in &report.risks {
        out.push_str(&format!("\n Risk: {}\n", risk.risk_text));
        out.push_str(&format!("    STRIDE: {}\n", risk.stride_category));

        out.push_str("    MITRE Techniques:\n");
        if risk.mitre_matches.is_empty() {
            out.push_str("     - None\n");
        } else {
            for m in &risk.mitre_matches {
                out.push_str(&format!("     - {} ({}) -> {}\n", m.name, m.id, m.url));
            }
        }

        out.push_str("    ISO 27001 Controls:\n");
        if risk.iso_controls.is_empty() {
            out.push_str("     - None\n");
        } else {
            for control in &risk.iso_controls {
                out.push_str(&format!("     - {}\n", control.reference));
            }
        }
    }

    out
}

/// Render technique search hits with truncated descriptions.
pub fn render_search_hits(hits: &[AttackTechnique]) -> String {
    if hits.is_empty() {
        return "No matching techniques found.\n".to_string();
    }

    let mut out = format!("\nFound {} matching techniques:\n\n", hits.len());
    for hit in hits {
        let description: String = hit.description.chars().take(150).collect();
        out.push_str(&format!("* {} ({})\n", hit.name, hit.id));
        out.push_str(&format!("   Description: {description}...\n"));
        out.push_str(&format!("   Tactics: {:?}\n", hit.tactics));
        out.push_str(&format!("   Platforms: {:?}\n", hit.platforms));
        out.push_str(&format!("   URL: {}\n\n", hit.url));
    }
    out
}

/// Render scored control mappings from the similarity ranker.
pub fn render_control_scores(scores: &[ControlScore]) -> String {
    let mut out = String::new();
    for score in scores {
        out.push_str(&format!(
            "{} - {} [{}] (score: {:.3})\n",
            score.control_id, score.control_title, score.section, score.score
        ));
    }
    out
}
