use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::protocol::DEFAULT_BASE_URL;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "comments.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub initial_limit: usize,
    pub request_timeout_secs: u64,
    pub validate_before_submit: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            initial_limit: 10,
            request_timeout_secs: 10,
            validate_before_submit: false,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// A zero timeout makes every request fail immediately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                value: self.request_timeout_secs.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    base_url: Option<String>,
    initial_limit: Option<usize>,
    request_timeout_secs: Option<u64>,
    validate_before_submit: Option<bool>,
    log_filter: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Defaults, then the config file, then environment variables. A missing
/// `comments.toml` in the working directory is fine; a missing file named
/// explicitly is not.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();
    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit_path.is_none() => {}
        Err(source) => return Err(ConfigError::Read { path, source }),
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.initial_limit {
        settings.initial_limit = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.validate_before_submit {
        settings.validate_before_submit = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("COMMENTS_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = lookup("APP__INITIAL_LIMIT") {
        settings.initial_limit = parse_env("APP__INITIAL_LIMIT", v)?;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = match parse_env("APP__REQUEST_TIMEOUT_SECS", v)? {
            0 => {
                return Err(ConfigError::InvalidValue {
                    key: "APP__REQUEST_TIMEOUT_SECS",
                    value: "0".to_string(),
                })
            }
            secs => secs,
        };
    }
    if let Some(v) = lookup("APP__VALIDATE_BEFORE_SUBMIT") {
        settings.validate_before_submit = parse_flag("APP__VALIDATE_BEFORE_SUBMIT", v)?;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
