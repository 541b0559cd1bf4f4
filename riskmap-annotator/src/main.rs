use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use riskmap_annotator::classify::StrideClassifier;
use riskmap_annotator::matchers::{ControlMatcher, TechniqueMatcher};
use riskmap_annotator::observability;
use riskmap_annotator::pipeline::{extract, AnnotateConfig, Annotator};
use riskmap_annotator::report;
use riskmap_core::corpus::{attack, iso, stride};

#[derive(Parser)]
#[command(name = "riskmap")]
#[command(about = "Risk report annotator: STRIDE, MITRE ATT&CK and ISO 27001 tagging")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a PDF risk report with STRIDE, ATT&CK and ISO references
    Annotate {
        /// Path to the PDF risk report
        #[arg(long)]
        pdf: PathBuf,
        /// ATT&CK STIX bundle JSON
        #[arg(long, default_value = "enterprise-attack.json")]
        attack: PathBuf,
        /// ISO 27001:2022 control list JSON
        #[arg(long, default_value = "iso_27001_2022_controls.json")]
        iso: PathBuf,
        /// STRIDE keyword map JSON replacing the built-in lists
        #[arg(long)]
        stride_keywords: Option<PathBuf>,
        /// TOML file overriding pipeline tunables
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory to write the JSON report into
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the raw text layer of a PDF
    ExtractText {
        /// Path to the PDF file
        #[arg(long)]
        pdf: PathBuf,
    },
    /// Search ATT&CK techniques by keyword
    Search {
        /// ATT&CK STIX bundle JSON
        #[arg(long, default_value = "enterprise-attack.json")]
        attack: PathBuf,
        /// Keyword to search; read from stdin when omitted
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Reduce an ATT&CK STIX bundle to its attack-pattern objects
    FilterTechniques {
        /// Full STIX bundle JSON
        #[arg(long)]
        input: PathBuf,
        /// Destination for the techniques-only JSON
        #[arg(long, default_value = "mitre_techniques_only.json")]
        output: PathBuf,
    },
    /// Map free text to the closest ISO 27001 controls
    MapControls {
        /// ISO 27001:2022 control list JSON
        #[arg(long, default_value = "iso_27001_2022_controls.json")]
        iso: PathBuf,
        /// Text to map
        #[arg(long)]
        text: String,
        /// Number of controls to return
        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    observability::logging::init_logging();

    // Initialize metrics recorder
    if let Err(e) = observability::metrics::init() {
        tracing::warn!("Metrics disabled: {e}");
    }

    let result = match cli.command {
        Commands::Annotate {
            pdf,
            attack,
            iso,
            stride_keywords,
            config,
            output,
        } => run_annotate(pdf, attack, iso, stride_keywords, config, output),
        Commands::ExtractText { pdf } => {
            let extracted = extract::extract_text_from_pdf(&pdf)?;
            println!("{}", extracted.text);
            Ok(())
        }
        Commands::Search { attack, keyword } => run_search(attack, keyword),
        Commands::FilterTechniques { input, output } => {
            let patterns = attack::filter_attack_patterns(&input)?;
            std::fs::write(&output, serde_json::to_string_pretty(&patterns)?)?;
            println!("Saved {} techniques to {}", patterns.len(), output.display());
            Ok(())
        }
        Commands::MapControls { iso, text, top_k } => {
            let matcher = ControlMatcher::new(iso::load_controls(&iso)?);
            let scores = matcher.top_k_by_similarity(&text, top_k);
            print!("{}", report::render_control_scores(&scores));
            Ok(())
        }
    };

    if let Some(snapshot) = observability::metrics::snapshot() {
        tracing::debug!("Final metrics snapshot:\n{snapshot}");
    }

    result
}

fn run_annotate(
    pdf: PathBuf,
    attack_path: PathBuf,
    iso_path: PathBuf,
    stride_keywords: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output: Option<String>,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => AnnotateConfig::from_toml_file(path)?,
        None => AnnotateConfig::default(),
    };

    let classifier = match stride_keywords {
        Some(path) => StrideClassifier::from_rules(stride::load_keyword_map(path)?),
        None => StrideClassifier::builtin(),
    };

    let technique_matcher = TechniqueMatcher::new(attack::load_techniques(&attack_path)?);
    let control_matcher = ControlMatcher::new(iso::load_controls(&iso_path)?);
    info!(
        "Corpora loaded: {} techniques, {} controls",
        technique_matcher.technique_count(),
        control_matcher.control_count()
    );

    let annotator = Annotator::new(classifier, technique_matcher, control_matcher, config);

    println!("Processing {}...", pdf.display());
    let annotation_report = annotator.annotate_pdf(&pdf)?;
    print!("{}", report::render_text(&annotation_report));

    if let Some(output_dir) = output {
        let path = Annotator::persist_to_json(&annotation_report, &output_dir)?;
        println!("\nSaved annotations to {path}");
    }

    Ok(())
}

fn run_search(attack_path: PathBuf, keyword: Option<String>) -> anyhow::Result<()> {
    println!("Loading MITRE ATT&CK techniques...");
    let matcher = TechniqueMatcher::new(attack::load_techniques(&attack_path)?);

    let keyword = match keyword {
        Some(keyword) => keyword,
        None => {
            print!("Enter a keyword to search (e.g., phishing, credential): ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line.trim().to_string()
        }
    };

    let hits = matcher.search(&keyword);
    print!("{}", report::render_search_hits(&hits));
    Ok(())
}
