use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "kinship.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Root label used when none is given on the command line.
    #[serde(default)]
    pub root: Option<String>,
    /// Fail on malformed lines instead of skipping them.
    #[serde(default)]
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text` or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Layer `self` over `base`: fields set in `self` win.
    #[must_use]
    pub fn over(self, base: Self) -> Self {
        Self {
            analysis: AnalysisConfig {
                root: self.analysis.root.or(base.analysis.root),
                strict: self.analysis.strict.or(base.analysis.strict),
            },
            output: OutputConfig {
                format: self.output.format.or(base.output.format),
            },
        }
    }

    #[must_use]
    pub fn strict(&self) -> bool {
        self.analysis.strict.unwrap_or(false)
    }
}

/// Parse a config file that must exist.
///
/// # Errors
///
/// Fails if the file cannot be read, or with [`AnalysisError::Config`] if
/// it is not valid TOML for [`Config`].
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content).map_err(|e| {
        AnalysisError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Load `kinship.toml` from `dir`, or defaults if absent.
///
/// # Errors
///
/// See [`load_config_file`].
pub fn load_project_config(dir: &Path) -> Result<Config> {
    let path = dir.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config_file(&path)
}

/// Path of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kinship/config.toml"))
}

/// Load the per-user config, or defaults if absent.
///
/// # Errors
///
/// See [`load_config_file`].
pub fn load_user_config() -> Result<Config> {
    match user_config_path() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => Ok(Config::default()),
    }
}

/// Resolve the effective config: user config, then the project config (or
/// `explicit` if given) on top.
///
/// # Errors
///
/// Fails if any config file that exists cannot be parsed, or if `explicit`
/// does not exist.
pub fn resolve_config(project_dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    let user = load_user_config()?;
    let project = match explicit {
        Some(path) => load_config_file(path)?,
        None => load_project_config(project_dir)?,
    };
    Ok(project.over(user))
}
