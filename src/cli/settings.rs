//! Handling for `mindease set` and `mindease unset`.

use std::fmt;

use crate::core::config::Config;
use crate::utils::url::normalize_base_url;

/// Keys accepted by `set` and `unset`, in display order.
pub const SETTING_KEYS: [&str; 4] = ["base-url", "default-model", "exclusive-requests", "theme"];

const THEMES: [&str; 2] = ["dark", "light"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    UnknownKey(String),
    UnknownTheme(String),
    InvalidBoolean(String),
    MissingValue(&'static str),
}

impl SettingError {
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Known keys: {}", SETTING_KEYS.join(", "));
            }
            SettingError::UnknownTheme(input) => {
                eprintln!("❌ Unknown theme: {input}. Available: {}", THEMES.join(", "));
            }
            SettingError::InvalidBoolean(input) => {
                eprintln!("❌ Invalid boolean value: {input}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::MissingValue(key) => {
                eprintln!("⚠️  Missing value for {key}");
                eprintln!("Example: mindease set {key} <value>");
            }
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "unknown config key: {key}"),
            SettingError::UnknownTheme(input) => write!(f, "unknown theme: {input}"),
            SettingError::InvalidBoolean(input) => write!(f, "invalid boolean value: {input}"),
            SettingError::MissingValue(key) => write!(f, "missing value for {key}"),
        }
    }
}

impl std::error::Error for SettingError {}

fn parse_bool(input: &str) -> Result<bool, SettingError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(SettingError::InvalidBoolean(input.to_string())),
    }
}

fn canonical_key(key: &str) -> Result<&'static str, SettingError> {
    SETTING_KEYS
        .iter()
        .copied()
        .find(|known| *known == key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

/// Apply `key = args` to `config` and return the confirmation line.
/// Multi-word values are joined with spaces.
pub fn set_setting(config: &mut Config, key: &str, args: &[String]) -> Result<String, SettingError> {
    let key = canonical_key(key)?;
    let value = args.join(" ");
    let value = value.trim();
    if value.is_empty() {
        return Err(SettingError::MissingValue(key));
    }

    match key {
        "base-url" => {
            let url = normalize_base_url(value);
            config.base_url = Some(url.clone());
            Ok(format!("✅ Set base-url to: {url}"))
        }
        "default-model" => {
            config.default_model = Some(value.to_string());
            Ok(format!("✅ Set default-model to: {value}"))
        }
        "exclusive-requests" => {
            let enabled = parse_bool(value)?;
            config.exclusive_requests = Some(enabled);
            let label = if enabled { "on" } else { "off" };
            Ok(format!("✅ Set exclusive-requests to: {label}"))
        }
        "theme" => {
            let theme = value.to_ascii_lowercase();
            if !THEMES.contains(&theme.as_str()) {
                return Err(SettingError::UnknownTheme(value.to_string()));
            }
            let message = format!("✅ Set theme to: {theme}");
            config.theme = Some(theme);
            Ok(message)
        }
        _ => Err(SettingError::UnknownKey(key.to_string())),
    }
}

/// Outcome of `mindease set`.
#[derive(Debug, PartialEq, Eq)]
pub enum SetCommand {
    /// No value was given: print the configuration.
    Show,
    /// The config changed and should be saved. Holds the confirmation line.
    Updated(String),
}

/// Resolve `mindease set [KEY [VALUE...]]`. A key is validated even when no
/// value follows it.
pub fn apply_set(
    config: &mut Config,
    key: Option<&str>,
    args: &[String],
) -> Result<SetCommand, SettingError> {
    let Some(key) = key else {
        return Ok(SetCommand::Show);
    };
    let key = canonical_key(key)?;
    if args.iter().all(|word| word.trim().is_empty()) {
        return Ok(SetCommand::Show);
    }
    set_setting(config, key, args).map(SetCommand::Updated)
}

pub fn unset_setting(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let key = canonical_key(key)?;
    match key {
        "base-url" => config.base_url = None,
        "default-model" => config.default_model = None,
        "exclusive-requests" => config.exclusive_requests = None,
        "theme" => config.theme = None,
        _ => return Err(SettingError::UnknownKey(key.to_string())),
    }
    Ok(format!("✅ Unset {key}"))
}
