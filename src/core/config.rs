use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::api::client::DEFAULT_BASE_URL;
use crate::core::constants::DEFAULT_MODEL;

/// Overrides `base_url` from the config file.
pub const BASE_URL_ENV_VAR: &str = "MINDEASE_BASE_URL";
/// Overrides `default_model` from the config file.
pub const MODEL_ENV_VAR: &str = "MINDEASE_MODEL";

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// No home/config directory could be determined for this user.
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
            ConfigError::NoConfigDir => write!(f, "Failed to determine config directory"),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::NoConfigDir => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend address, e.g. `http://localhost:8000`
    pub base_url: Option<String>,
    /// Model assumed active until the backend reports one
    pub default_model: Option<String>,
    /// Forbid overlapping chat sends and model switches
    pub exclusive_requests: Option<bool>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_from_path(&Self::config_path()?)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Write atomically: a temp file in the same directory is renamed over the target.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("org", "mindease", "mindease").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn exclusive_requests(&self) -> bool {
        self.exclusive_requests.unwrap_or(false)
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, using {DEFAULT_BASE_URL})"),
        }
        match &self.default_model {
            Some(model) => println!("  default-model: {model}"),
            None => println!("  default-model: (unset, using {DEFAULT_MODEL})"),
        }
        match self.exclusive_requests() {
            true => println!("  exclusive-requests: on"),
            false => println!("  exclusive-requests: off"),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset)"),
        }
    }
}

/// Effective settings after layering flags, environment, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub base_url: String,
    pub default_model: String,
    pub exclusive_requests: bool,
}

/// Flag values beat the environment, which beats the config file.
pub fn resolve_settings(
    config: &Config,
    base_url_flag: Option<&str>,
    model_flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedSettings {
    let non_empty = |value: String| {
        let trimmed = value.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    let base_url = base_url_flag
        .map(str::to_string)
        .and_then(non_empty)
        .or_else(|| env(BASE_URL_ENV_VAR).and_then(non_empty))
        .or_else(|| config.base_url.clone().and_then(non_empty))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let default_model = model_flag
        .map(str::to_string)
        .and_then(non_empty)
        .or_else(|| env(MODEL_ENV_VAR).and_then(non_empty))
        .or_else(|| config.default_model.clone().and_then(non_empty))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    ResolvedSettings {
        base_url,
        default_model,
        exclusive_requests: config.exclusive_requests(),
    }
}

/// [`resolve_settings`] against the process environment.
pub fn resolve_from_env(
    config: &Config,
    base_url_flag: Option<&str>,
    model_flag: Option<&str>,
) -> ResolvedSettings {
    resolve_settings(config, base_url_flag, model_flag, |key| {
        std::env::var(key).ok()
    })
}
