//! Dashboard runtime configuration.
//!
//! The frontend reads these values from `data-*` attributes on its mount
//! element; anything missing falls back to the defaults below.

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1000;
pub const DEFAULT_STARTUP_DELAY_MS: u32 = 500;
pub const DEFAULT_THRESHOLD: u8 = 50;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend API root, without trailing slash.
    pub api_base: String,
    pub poll_interval_ms: u32,
    /// Delay between mount and the first poll.
    pub startup_delay_ms: u32,
    pub log_level: log::LevelFilter,
    /// Initial humidity threshold slider position, in percent.
    pub initial_threshold: u8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            startup_delay_ms: DEFAULT_STARTUP_DELAY_MS,
            log_level: log::LevelFilter::Info,
            initial_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DashboardConfig {
    /// Build a config from a key lookup such as an element's `data-*` attributes.
    ///
    /// Keys are `api-base`, `poll-interval-ms`, `startup-delay-ms`,
    /// `log-level` and `threshold`. Invalid values are collected and the
    /// default is kept for those keys.
    pub fn from_attributes<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(base) = lookup("api-base") {
            let base = base.trim().trim_end_matches('/');
            if !base.is_empty() {
                config.api_base = base.to_string();
            }
        }

        match parse_positive(&lookup, "poll-interval-ms") {
            Ok(Some(ms)) => config.poll_interval_ms = ms,
            Ok(None) => {}
            Err(e) => errors.push(e),
        }

        if let Some(raw) = lookup("startup-delay-ms") {
            match raw.trim().parse::<u32>() {
                Ok(ms) => config.startup_delay_ms = ms,
                Err(_) => errors.push(ConfigError::InvalidValue {
                    key: "startup-delay-ms",
                    value: raw,
                }),
            }
        }

        if let Some(raw) = lookup("log-level") {
            match raw.trim().parse::<log::LevelFilter>() {
                Ok(level) => config.log_level = level,
                Err(_) => errors.push(ConfigError::InvalidValue {
                    key: "log-level",
                    value: raw,
                }),
            }
        }

        if let Some(raw) = lookup("threshold") {
            match raw.trim().parse::<u8>() {
                Ok(v) if v <= 100 => config.initial_threshold = v,
                _ => errors.push(ConfigError::InvalidValue {
                    key: "threshold",
                    value: raw,
                }),
            }
        }

        (config, errors)
    }
}

fn parse_positive<F>(lookup: &F, key: &'static str) -> Result<Option<u32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
        })?;
    if value == 0 {
        return Err(ConfigError::Zero { key });
    }
    Ok(Some(value))
}
