//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillmatch_core::profile::ProfileStore;
use skillmatch_providers::{create_provider, Provider, SkillmatchConfig};

pub mod assess;
pub mod init;
pub mod jobs;
pub mod profile;
pub mod projects;
pub mod resume;

/// Instantiate the named provider (or the config's default) from config.
pub(crate) fn provider_from_config(
    config: &SkillmatchConfig,
    name: Option<&str>,
) -> Result<Provider> {
    let name = name.unwrap_or(&config.default_provider);
    let pconfig = config.providers.get(name).with_context(|| {
        format!(
            "provider '{}' not found in config. Available: {:?}. \
             Run `skillmatch init` and add an API key, or set SKILLMATCH_GEMINI_KEY.",
            name,
            config.providers.keys().collect::<Vec<_>>()
        )
    })?;
    create_provider(name, pconfig)
}

/// The profile store, rooted at the configured data dir or the default
/// config directory.
pub(crate) fn profile_store(config: &SkillmatchConfig) -> Result<ProfileStore> {
    match &config.data_dir {
        Some(dir) => Ok(ProfileStore::new(dir)),
        None => ProfileStore::default_location(),
    }
}

/// Output directory for reports: CLI override, else config.
pub(crate) fn output_dir(config: &SkillmatchConfig, cli_override: Option<PathBuf>) -> PathBuf {
    cli_override.unwrap_or_else(|| config.output_dir.clone())
}
