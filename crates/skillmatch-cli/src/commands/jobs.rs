//! The `skillmatch jobs` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use skillmatch_core::jobs::{curated_jobs, filter_by_workplace, match_score, Workplace};
use skillmatch_providers::config::load_config_from;

use super::profile_store;

pub fn execute(filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let workplace: Option<Workplace> = match filter.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(raw.parse().map_err(|e: String| anyhow::anyhow!(e))?),
    };

    // Match scores need a profile; without one, every posting shows 0%.
    let profile_skills = profile_store(&config)?
        .load()?
        .map(|p| p.skills)
        .unwrap_or_default();

    let jobs = filter_by_workplace(curated_jobs(), workplace);
    if jobs.is_empty() {
        println!("No postings for that filter.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Company", "Role", "Location", "Salary", "Skills", "Match",
    ]);
    for job in &jobs {
        table.add_row(vec![
            Cell::new(&job.company),
            Cell::new(&job.role),
            Cell::new(&job.location),
            Cell::new(&job.salary),
            Cell::new(job.skills_required.join(", ")),
            Cell::new(format!(
                "{}%",
                match_score(&profile_skills, &job.skills_required)
            )),
        ]);
    }
    println!("{table}");

    if profile_skills.is_empty() {
        println!("Tip: create a profile (`skillmatch profile create`) to see real match scores.");
    }
    Ok(())
}
