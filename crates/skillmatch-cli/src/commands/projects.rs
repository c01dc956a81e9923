//! The `skillmatch projects` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillmatch_core::traits::CareerAdvisor;
use skillmatch_providers::config::load_config_from;

use super::{profile_store, provider_from_config};

pub async fn execute(
    goal: String,
    skills: Option<String>,
    provider_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = provider_from_config(&config, provider_name.as_deref())?;

    let skills: Vec<String> = match skills {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => profile_store(&config)?
            .load()?
            .context(
                "no stored profile; pass --skills or create one with `skillmatch profile create`",
            )?
            .skills,
    };
    anyhow::ensure!(!skills.is_empty(), "no skills to recommend from");

    eprintln!("Generating project roadmap...");
    let projects = provider
        .recommend_projects(&skills, &goal)
        .await
        .context("project recommendation failed")?;

    for (i, project) in projects.iter().enumerate() {
        println!("\n{}. {} [{}]", i + 1, project.title, project.difficulty);
        println!("   Stack: {}", project.tech_stack.join(", "));
        for (step, item) in project.roadmap.iter().enumerate() {
            println!("   {}. {item}", step + 1);
        }
        if let Some(template) = &project.github_template {
            println!("   Starter: {template}");
        }
    }

    Ok(())
}
