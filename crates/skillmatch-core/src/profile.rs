//! User profile persistence.
//!
//! The application persists exactly one record: the user's profile, as a
//! single JSON blob under a fixed file name. The store is owned by the
//! composition root and loaded/saved only at defined lifecycle points
//! (startup, profile creation, profile update) — never through ambient
//! global access.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::UserProfile;

/// Fixed file name of the profile blob.
pub const PROFILE_FILE: &str = "profile.json";

/// Load/save handle for the single stored profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store rooted at a data directory; the blob lives at
    /// `<dir>/profile.json`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(PROFILE_FILE),
        }
    }

    /// The default store under `~/.config/skillmatch/`.
    pub fn default_location() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME is not set")?;
        let dir = PathBuf::from(home).join(".config").join("skillmatch");
        Ok(Self::new(&dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored profile, or `None` if no profile exists yet.
    pub fn load(&self) -> Result<Option<UserProfile>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read profile from {}", self.path.display()))?;
        let profile: UserProfile =
            serde_json::from_str(&content).context("failed to parse profile JSON")?;
        Ok(Some(profile))
    }

    /// Write the profile blob, creating the data directory if needed.
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string_pretty(profile).context("failed to serialize profile")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write profile to {}", self.path.display()))?;
        Ok(())
    }

    /// Load, apply an edit, and save. Fails if no profile exists.
    pub fn update<F>(&self, edit: F) -> Result<UserProfile>
    where
        F: FnOnce(&mut UserProfile),
    {
        let mut profile = self
            .load()?
            .context("no profile found; create one with `skillmatch profile create`")?;
        edit(&mut profile);
        self.save(&profile)?;
        Ok(profile)
    }

    /// Remove the stored profile, if any.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}
