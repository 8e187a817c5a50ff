//! Runtime configuration parsed from environment variables.

use crate::bus::{BOAT_MESSAGE_CHANNEL, DEFAULT_SUBSCRIBER_CAPACITY};
use crate::error::ErrorCode;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "E_CONFIG_MISSING",
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub timeouts: Timeouts,
    pub message_channel: String,
    pub subscriber_capacity: usize,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `BOATS_API_BASE_URL`: data service root, trailing `/` trimmed
    ///
    /// Optional:
    /// - `BOATS_API_TOKEN`: bearer token sent with every request
    /// - `BOATS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BOATS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `BOAT_MESSAGE_CHANNEL`: default `BoatMessageChannel`
    /// - `BUS_SUBSCRIBER_CAPACITY`: default 64
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] without a base URL and
    /// [`ConfigError::Invalid`] if it is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("BOATS_API_BASE_URL").map_err(|_| ConfigError::Missing { var: "BOATS_API_BASE_URL" })?;
        let api_base_url = parse_base_url(&raw_url)?;

        let api_token = std::env::var("BOATS_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let timeouts = Timeouts {
            request_secs: env_parse("BOATS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("BOATS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let message_channel = std::env::var("BOAT_MESSAGE_CHANNEL")
            .ok()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| BOAT_MESSAGE_CHANNEL.to_owned());

        Ok(Self {
            api_base_url,
            api_token,
            timeouts,
            message_channel,
            subscriber_capacity: env_parse("BUS_SUBSCRIBER_CAPACITY", DEFAULT_SUBSCRIBER_CAPACITY),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            var: "BOATS_API_BASE_URL",
            reason: format!("expected http(s) URL, got '{raw}'"),
        });
    }
    Ok(trimmed.to_owned())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
