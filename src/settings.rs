//! Program settings with layered loading.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/arbook/arbook.toml`
//! 3. Environment variables: `ARBOOK_*` prefix

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config error: {message}")]
    Config { message: String },
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError::Config {
        message: e.to_string(),
    }
}

/// Unified program settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Record book opened when no file is given on the command line.
    pub file: Option<PathBuf>,
    /// Rotated backup copies kept when saving over an existing file.
    pub backups: u32,
    /// Whether name completion lists include the Info section entries.
    pub use_info_in_lists: bool,
    /// Whether hidden Info entries still show up in completion lists.
    pub include_hidden_info: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file: None,
            backups: 3,
            use_info_in_lists: true,
            include_hidden_info: false,
        }
    }
}

/// The XDG config directory for the program.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "arbook").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("arbook.toml"))
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(stripped),
        None => path.to_path_buf(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    pub fn load() -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("backups", defaults.backups)
            .map_err(config_err)?
            .set_default("use_info_in_lists", defaults.use_info_in_lists)
            .map_err(config_err)?
            .set_default("include_hidden_info", defaults.include_hidden_info)
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            builder = builder.add_source(File::from(global_path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("ARBOOK").separator("__"));

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        if let Some(file) = settings.file.take() {
            settings.file = Some(expand_tilde(&file));
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# arbook configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/arbook/arbook.toml
#   Env:    ARBOOK_* environment variables (explicit overrides)

# Record book opened when none is given on the command line
# file = "~/agility/mydogs.arb"

# Rotated backup copies kept when saving over an existing file
# backups = 3

# Include Info section entries in name completion lists
# use_info_in_lists = true

# Also include entries marked not-visible
# include_hidden_info = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load().expect("load defaults");
        assert_eq!(settings.backups, 3);
        assert!(settings.use_info_in_lists);
        assert!(!settings.include_hidden_info);
    }

    #[test]
    fn given_tilde_path_when_expanded_then_starts_at_home() {
        let expanded = expand_tilde(std::path::Path::new("~/agility/dogs.arb"));
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().ends_with("agility/dogs.arb"));
    }

    #[test]
    fn given_settings_when_rendered_then_round_trips_through_toml() {
        let settings = Settings {
            file: Some(PathBuf::from("/tmp/dogs.arb")),
            backups: 5,
            use_info_in_lists: false,
            include_hidden_info: true,
        };
        let toml = settings.to_toml().expect("serialize");
        let parsed: Settings = toml::from_str(&toml).expect("parse");
        assert_eq!(parsed, settings);
    }
}
