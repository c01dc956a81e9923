//! The `skillmatch resume` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use skillmatch_core::traits::CareerAdvisor;
use skillmatch_providers::config::load_config_from;

use super::provider_from_config;

pub async fn execute(
    file: PathBuf,
    target_role: Option<String>,
    provider_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = provider_from_config(&config, provider_name.as_deref())?;

    let resume_text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read resume from {}", file.display()))?;
    anyhow::ensure!(!resume_text.trim().is_empty(), "resume file is empty");

    eprintln!("Analyzing resume...");
    let analysis = provider
        .analyze_resume(&resume_text, target_role.as_deref())
        .await
        .context("resume analysis failed")?;

    let mut table = Table::new();
    table.set_header(vec!["ATS Score", "Role Relevance"]);
    table.add_row(vec![
        Cell::new(format!("{}%", analysis.ats_score)),
        Cell::new(format!("{}%", analysis.relevance_to_role)),
    ]);
    println!("{table}");

    if !analysis.missing_keywords.is_empty() {
        println!("\nMissing keywords:");
        for keyword in &analysis.missing_keywords {
            println!("  - {keyword}");
        }
    }
    if !analysis.improvements.is_empty() {
        println!("\nSuggested improvements:");
        for improvement in &analysis.improvements {
            println!("  - {improvement}");
        }
    }
    if let Some(summary) = &analysis.suggested_summary {
        println!("\nSuggested summary:\n  {summary}");
    }

    Ok(())
}
