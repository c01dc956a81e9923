//! The `skillmatch profile` command family.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use skillmatch_core::model::{ExperienceLevel, UserProfile};
use skillmatch_providers::config::load_config_from;

use super::profile_store;

pub fn create(name: String, email: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = profile_store(&config)?;
    anyhow::ensure!(
        store.load()?.is_none(),
        "a profile already exists at {}; delete it first with `skillmatch profile delete`",
        store.path().display()
    );

    let profile = UserProfile::new(&name, &email);
    store.save(&profile)?;
    println!("Created profile for {} ({})", profile.full_name, profile.email);
    println!("Stored at: {}", store.path().display());
    Ok(())
}

pub fn show(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = profile_store(&config)?;
    let profile = store
        .load()?
        .context("no stored profile; create one with `skillmatch profile create`")?;

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("Name"), Cell::new(&profile.full_name)]);
    table.add_row(vec![Cell::new("Email"), Cell::new(&profile.email)]);
    table.add_row(vec![Cell::new("Education"), Cell::new(&profile.education)]);
    table.add_row(vec![
        Cell::new("Experience"),
        Cell::new(profile.experience_level.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Skills"),
        Cell::new(profile.skills.join(", ")),
    ]);
    table.add_row(vec![
        Cell::new("Employability"),
        Cell::new(format!("{}%", profile.employability_score)),
    ]);
    table.add_row(vec![
        Cell::new("Status"),
        Cell::new(profile.status.to_string()),
    ]);
    if let Some(location) = &profile.location {
        table.add_row(vec![Cell::new("Location"), Cell::new(location)]);
    }
    if let Some(bio) = &profile.bio {
        table.add_row(vec![Cell::new("Bio"), Cell::new(bio)]);
    }
    println!("{table}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn set(
    education: Option<String>,
    experience: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    add_skills: Vec<String>,
    remove_skills: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = profile_store(&config)?;

    let experience: Option<ExperienceLevel> = experience
        .map(|raw| raw.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let updated = store.update(|profile| {
        if let Some(education) = education {
            profile.education = education;
        }
        if let Some(experience) = experience {
            profile.experience_level = experience;
        }
        if let Some(bio) = bio {
            profile.bio = Some(bio);
        }
        if let Some(location) = location {
            profile.location = Some(location);
        }
        for skill in add_skills {
            if !profile
                .skills
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&skill))
            {
                profile.skills.push(skill);
            }
        }
        profile
            .skills
            .retain(|s| !remove_skills.iter().any(|r| r.eq_ignore_ascii_case(s)));
    })?;

    println!(
        "Updated profile for {} ({} skills)",
        updated.full_name,
        updated.skills.len()
    );
    Ok(())
}

pub fn delete(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = profile_store(&config)?;
    store.clear()?;
    println!("Profile deleted.");
    Ok(())
}
