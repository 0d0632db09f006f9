use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{parse_release_version, TagPattern};
use crate::error::{ReleaseError, Result};
use crate::render::TemplateStyle;

/// Per-repository configuration for conventional-release.
///
/// Passed explicitly into the orchestrator and the event handler; every
/// field falls back to its default when absent from the file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Version assumed when the repository has never been released
    #[serde(default = "default_initial_version")]
    pub initial_version: String,

    /// Branch whose pushes (and pull requests targeting it) produce releases
    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    /// Tag naming convention, must contain `{version}`
    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    #[serde(default)]
    pub template: TemplateStyle,
}

fn default_initial_version() -> String {
    "0.0.0".to_string()
}

fn default_release_branch() -> String {
    "master".to_string()
}

fn default_tag_format() -> String {
    "v{version}".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_version: default_initial_version(),
            release_branch: default_release_branch(),
            tag_format: default_tag_format(),
            template: TemplateStyle::default(),
        }
    }
}

impl Config {
    /// Check that the tag format and initial version are usable
    pub fn validate(&self) -> Result<()> {
        self.tag_pattern()?;
        if parse_release_version(&self.initial_version).is_none() {
            return Err(ReleaseError::config(format!(
                "initial_version '{}' is not a semantic version",
                self.initial_version
            )));
        }
        if self.release_branch.trim().is_empty() {
            return Err(ReleaseError::config("release_branch must not be empty"));
        }
        self.template.validate()
    }

    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag_format.clone())
    }

    /// Full ref a push to the release branch carries, e.g. `refs/heads/master`
    pub fn release_ref(&self) -> String {
        format!("refs/heads/{}", self.release_branch)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.github/conventional-release.toml` in current directory
/// 3. `conventional-release.toml` in current directory
/// 4. Default configuration if no file found
///
/// The loaded configuration is validated before it is returned.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let candidates = [
        Path::new(".github/conventional-release.toml"),
        Path::new("conventional-release.toml"),
    ];

    let config_str = match config_path {
        Some(path) => Some(fs::read_to_string(path)?),
        None => match candidates.iter().find(|path| path.exists()) {
            Some(path) => Some(fs::read_to_string(path)?),
            None => None,
        },
    };

    let config = match config_str {
        Some(text) => parse_config(&text)?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Parse configuration from TOML text without validating it
pub fn parse_config(text: &str) -> Result<Config> {
    Ok(toml::from_str(text)?)
}
