//! assessment-cli: run scripted assessment sessions from the command line
//!
//! Useful for checking content changes and configuration tweaks without a UI:
//! - `run` drives one session with a scripted respondent and prints the report
//! - `batch` runs many independent sessions in parallel and summarizes them
//! - `fingerprint` prints the content version sessions will be tagged with
//! - `config` prints the effective configuration as YAML

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use assessment::{
    parse_respondent, run_session, simulate_batch, standard_respondents, AssessmentConfig,
    AssessmentEngine, ResultReport,
};
use typology::ContentPools;

#[derive(Parser)]
#[command(name = "assessment-cli")]
#[command(about = "Run scripted nine-type assessment sessions")]
struct Cli {
    /// Path to a YAML engine configuration
    #[arg(short, long, env = "ASSESSMENT_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one session with a scripted respondent
    Run {
        /// Respondent: gut, heart, head or type:N
        #[arg(short, long, default_value = "gut")]
        respondent: String,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a batch of sessions over the standard respondents
    Batch {
        /// Number of sessions to run
        #[arg(short, long, default_value = "12")]
        sessions: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the content fingerprint
    Fingerprint,

    /// Print the effective configuration as YAML
    Config,
}

fn load_config(path: Option<&str>) -> anyhow::Result<AssessmentConfig> {
    let Some(path) = path else {
        return Ok(AssessmentConfig::default());
    };
    if !Path::new(path).exists() {
        info!("Config file {} not found, using defaults", path);
        return Ok(AssessmentConfig::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    AssessmentConfig::from_yaml(&content).with_context(|| format!("parsing config {}", path))
}

fn print_report(report: &ResultReport) {
    println!("Session:      {}", report.session_id);
    println!(
        "Primary type: {} ({}), confidence {}%",
        report.primary_type,
        report.primary_type.name(),
        report.confidence
    );
    println!("Wing:         {}", report.wing_code);
    println!("Center:       {}", report.dominant_center.as_str());
    println!(
        "Instincts:    {} (dominant {}, strength {:.0})",
        report.instinct_stack.stack_code(),
        report.instinct_stack.dominant().name(),
        report.instinct_stack.dominant_strength
    );
    println!(
        "Health:       {} ({:.0})",
        report.health.level.as_str(),
        report.health.score
    );
    println!("              {}", report.health.interpretation);
    println!();
    for entry in &report.all_type_scores {
        println!(
            "  {} {:>3}%  {:>7.2}",
            entry.type_number, entry.percentage, entry.score
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("assessment=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let engine = AssessmentEngine::with_content(config, ContentPools::standard())?;

    match cli.command {
        Commands::Run { respondent, json } => {
            let respondent = parse_respondent(&respondent)?;
            info!(respondent = %respondent.name(), "Running session");
            let report = run_session(&engine, respondent.as_ref())?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print_report(&report);
            }
        }
        Commands::Batch { sessions, json } => {
            let pool = standard_respondents();
            let respondents = pool.iter().cycle().take(sessions).cloned().collect();
            let summary = simulate_batch(Arc::new(engine), respondents).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} sessions, mean confidence {:.1}%",
                    summary.sessions, summary.mean_confidence
                );
                for (type_number, count) in &summary.primary_type_counts {
                    println!("  type {}: {}", type_number, count);
                }
                for violation in &summary.invariant_violations {
                    println!("  violation: {}", violation);
                }
            }

            if !summary.is_clean() {
                anyhow::bail!(
                    "{} invariant violations",
                    summary.invariant_violations.len()
                );
            }
        }
        Commands::Fingerprint => {
            println!("{}", engine.content_version());
        }
        Commands::Config => {
            print!("{}", engine.config().to_yaml()?);
        }
    }

    Ok(())
}
