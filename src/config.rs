//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/todotree/todotree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `TODOTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, DEMO_TODOS};
use crate::domain::VisibilityFilter;

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub visibility_filter: Option<String>,
    pub demo_mode: Option<bool>,
    pub seed_demo: Option<bool>,
    pub demo_todos: Option<Vec<String>>,
}

/// Unified configuration for todotree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Filter applied to the visible list at startup (default: SHOW_ALL)
    pub visibility_filter: VisibilityFilter,
    /// UI-only demo flag carried by the store
    pub demo_mode: bool,
    /// Seed a fresh store with `demo_todos`
    pub seed_demo: bool,
    /// Root-level todos created when seeding
    pub demo_todos: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            visibility_filter: VisibilityFilter::ShowAll,
            demo_mode: true,
            seed_demo: true,
            demo_todos: DEMO_TODOS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Get the XDG config directory for todotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "todotree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("todotree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Unset variables are None; values that do not parse are config errors.
fn env_value<T>(value: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match value {
        Ok(v) => Ok(Some(v)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

impl Settings {
    /// Overlay wins for every field it specifies.
    ///
    /// Filter names are validated here, so a bad name fails with `InvalidFilter`.
    pub fn merge_with(&self, overlay: &RawSettings) -> Result<Self, ApplicationError> {
        let visibility_filter = match &overlay.visibility_filter {
            Some(name) => name.parse::<VisibilityFilter>()?,
            None => self.visibility_filter,
        };
        Ok(Self {
            visibility_filter,
            demo_mode: overlay.demo_mode.unwrap_or(self.demo_mode),
            seed_demo: overlay.seed_demo.unwrap_or(self.seed_demo),
            demo_todos: overlay
                .demo_todos
                .clone()
                .unwrap_or_else(|| self.demo_todos.clone()),
        })
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?)?;
            }
        }

        current = current.apply_file(config_file)?;
        Self::apply_env_overrides(current)
    }

    /// Load defaults plus an explicit file, skipping the global file and env vars.
    pub fn load_file(config_file: &Path) -> Result<Self, ApplicationError> {
        Self::default().apply_file(Some(config_file))
    }

    fn apply_file(self, config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        match config_file {
            Some(path) => self.merge_with(&load_raw_settings(path)?),
            None => Ok(self),
        }
    }

    /// Apply TODOTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TODOTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("demo_todos")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            visibility_filter: env_value(config.get_string("visibility_filter"))?,
            demo_mode: env_value(config.get_bool("demo_mode"))?,
            seed_demo: env_value(config.get_bool("seed_demo"))?,
            demo_todos: env_value(config.get::<Vec<String>>("demo_todos"))?,
        };
        settings.merge_with(&raw)
    }

    /// Render as TOML for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
