//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use skillmatch_core::error::FetchError;
use skillmatch_core::model::{Question, RecommendedProject, ResumeAnalysis};
use skillmatch_core::traits::{CareerAdvisor, QuestionSource};

use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single AI provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                model,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                model,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("model", model)
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
        }
    }
}

/// Top-level skillmatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillmatchConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Questions per assessment session.
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    /// Assessment time budget in seconds.
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u64,
    /// Output directory for assessment reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Data directory for the profile blob; defaults to the config dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_question_count() -> u32 {
    5
}
fn default_time_limit_secs() -> u64 {
    900
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./skillmatch-results")
}

impl Default for SkillmatchConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            question_count: default_question_count(),
            time_limit_secs: default_time_limit_secs(),
            output_dir: default_output_dir(),
            data_dir: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            model,
            base_url,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            model: model.clone(),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            model,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            model: model.clone(),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillmatch.toml` in the current directory
/// 2. `~/.config/skillmatch/config.toml`
///
/// Environment variable overrides: `SKILLMATCH_GEMINI_KEY`,
/// `SKILLMATCH_OPENAI_KEY`.
pub fn load_config() -> Result<SkillmatchConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SkillmatchConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skillmatch.toml");
        if local.exists() {
            Some(local)
        } else if let Some(dir) = config_dir() {
            let global = dir.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SkillmatchConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkillmatchConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("SKILLMATCH_GEMINI_KEY") {
        config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                model: None,
                base_url: None,
            });
        if let Some(ProviderConfig::Gemini { api_key, .. }) = config.providers.get_mut("gemini") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("SKILLMATCH_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                model: None,
                base_url: None,
                org_id: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

/// `~/.config/skillmatch`, shared by the config file and the profile blob.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillmatch"))
}

/// A configured AI backend. One value serves both traits, so the
/// composition root can hand the same `Arc` to the assessment engine
/// (as a `QuestionSource`) and to the advisor commands.
pub enum Provider {
    Gemini(GeminiProvider),
    OpenAi(OpenAiProvider),
}

#[async_trait]
impl QuestionSource for Provider {
    fn name(&self) -> &str {
        match self {
            Provider::Gemini(p) => p.name(),
            Provider::OpenAi(p) => p.name(),
        }
    }

    async fn fetch_questions(
        &self,
        domain: &str,
        count: u32,
    ) -> Result<Vec<Question>, FetchError> {
        match self {
            Provider::Gemini(p) => p.fetch_questions(domain, count).await,
            Provider::OpenAi(p) => p.fetch_questions(domain, count).await,
        }
    }
}

#[async_trait]
impl CareerAdvisor for Provider {
    async fn analyze_resume(
        &self,
        resume_text: &str,
        target_role: Option<&str>,
    ) -> Result<ResumeAnalysis, FetchError> {
        match self {
            Provider::Gemini(p) => p.analyze_resume(resume_text, target_role).await,
            Provider::OpenAi(p) => p.analyze_resume(resume_text, target_role).await,
        }
    }

    async fn recommend_projects(
        &self,
        skills: &[String],
        goal: &str,
    ) -> Result<Vec<RecommendedProject>, FetchError> {
        match self {
            Provider::Gemini(p) => p.recommend_projects(skills, goal).await,
            Provider::OpenAi(p) => p.recommend_projects(skills, goal).await,
        }
    }
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Provider> {
    let _ = name;
    match config {
        ProviderConfig::Gemini {
            api_key,
            model,
            base_url,
        } => Ok(Provider::Gemini(GeminiProvider::new(
            api_key,
            model.clone(),
            base_url.clone(),
        ))),
        ProviderConfig::OpenAI {
            api_key,
            model,
            base_url,
            org_id,
        } => Ok(Provider::OpenAi(OpenAiProvider::new(
            api_key,
            model.clone(),
            base_url.clone(),
            org_id.clone(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_SKILLMATCH_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_SKILLMATCH_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_SKILLMATCH_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_SKILLMATCH_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = SkillmatchConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.question_count, 5);
        assert_eq!(config.time_limit_secs, 900);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
[providers.gemini]
type = "gemini"
api_key = "test-gemini"

[providers.openai]
type = "openai"
api_key = "sk-openai"
model = "gpt-4.1"

default_provider = "gemini"
question_count = 10
"#;
        let config: SkillmatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.question_count, 10);
        assert!(matches!(
            config.providers.get("gemini"),
            Some(ProviderConfig::Gemini { .. })
        ));
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            model: None,
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn explicit_missing_config_path_fails() {
        assert!(load_config_from(Some(Path::new("no_such_config.toml"))).is_err());
    }
}
