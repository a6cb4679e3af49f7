use crate::error::{HostError, Result};
use serde::Deserialize;

const LOG_LEVELS: [&str; 5] = ["debug", "info", "warn", "error", "nope"];

pub const DEV_MODE_ENV: &str = "ROVER_HOST_DEV_MODE";
pub const LOG_LEVEL_ENV: &str = "ROVER_HOST_LOG_LEVEL";

/// Runtime settings for host handles
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Development diagnostics (style prop warnings, misuse warnings)
    pub dev_mode: bool,
    /// One of debug, info, warn, error, or "nope" to disable logging
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            dev_mode: cfg!(debug_assertions),
            log_level: "info".to_string(),
        }
    }
}

impl HostConfig {
    pub fn development() -> Self {
        Self {
            dev_mode: true,
            ..Self::default()
        }
    }

    pub fn production() -> Self {
        Self {
            dev_mode: false,
            ..Self::default()
        }
    }

    /// Parse a JSON object such as `{ "dev_mode": true, "log_level": "debug" }`
    pub fn from_json_str(input: &str) -> Result<Self> {
        let mut config: HostConfig = serde_json::from_str(input)?;
        config.log_level = normalize_log_level(&config.log_level)?;
        Ok(config)
    }

    /// Defaults overridden by `ROVER_HOST_DEV_MODE` and `ROVER_HOST_LOG_LEVEL`
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DEV_MODE_ENV) {
            config.dev_mode = matches!(
                raw.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.log_level = normalize_log_level(&level)?;
        }

        Ok(config)
    }

    pub fn logging_enabled(&self) -> bool {
        self.log_level != "nope"
    }
}

fn normalize_log_level(level: &str) -> Result<String> {
    let level = level.trim().to_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(HostError::InvalidLogLevel(level))
    }
}

/// Install a global fmt subscriber for the configured level.
/// Returns false when logging is disabled or a subscriber is already set.
pub fn init_tracing(config: &HostConfig) -> bool {
    if !config.logging_enabled() {
        return false;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok()
}
