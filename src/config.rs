//! Publish configuration loaded from a JSON file.
//!
//! String fields may use two placeholders: `{VERSION_NUMBER}` expands to
//! `version.number` and `{GAME_VERSION}` to the first entry of
//! `version.game_versions`. A leading `~/` in the artifact path expands to
//! the home directory.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub project: ProjectConfig,
    pub version: VersionConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Opaque Modrinth project ID.
    pub modrinth_id: String,
    pub github_owner: String,
    pub github_repo: String,
    /// Desired public summary text, shared by both platforms.
    pub summary: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VersionConfig {
    /// Pre-formatted version string, e.g. "3.4.2".
    pub number: String,
    /// Display-name template for the release.
    pub name: String,
    /// Base changelog text; platform variants are rendered from it.
    pub changelog: String,
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
    /// Path template for the local artifact file.
    pub file_path: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.version.game_versions.is_empty() {
            bail!("version.game_versions must not be empty");
        }
        if self.version.loaders.is_empty() {
            bail!("version.loaders must not be empty");
        }
        Ok(())
    }

    /// Release display name with placeholders expanded.
    pub fn version_name(&self) -> String {
        self.expand(&self.version.name)
    }

    /// Desired summary text with placeholders expanded.
    pub fn summary(&self) -> String {
        self.expand(&self.project.summary)
    }

    /// Local path of the artifact file, with placeholders and `~/` expanded.
    pub fn artifact_path(&self) -> PathBuf {
        expand_home(&self.expand(&self.version.file_path))
    }

    fn expand(&self, template: &str) -> String {
        let game_version = self
            .version
            .game_versions
            .first()
            .map(String::as_str)
            .unwrap_or_default();
        template
            .replace("{VERSION_NUMBER}", &self.version.number)
            .replace("{GAME_VERSION}", game_version)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
