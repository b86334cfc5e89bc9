//! Studio configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::StudioError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// API origin without a trailing slash.
    pub api_url: String,
    /// File holding the persisted bearer token.
    pub token_path: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl StudioConfig {
    /// Build typed studio config from environment variables.
    ///
    /// Optional:
    /// - `MOLBERT_API_URL`: default `http://localhost:8000`
    /// - `MOLBERT_TOKEN_PATH`: default `<config dir>/molbert/storage.json`
    /// - `MOLBERT_REQUEST_TIMEOUT_SECS`: default 120
    /// - `MOLBERT_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Config`] when no token path is set and the
    /// platform has no config directory.
    pub fn from_env() -> Result<Self, StudioError> {
        let api_url = normalize_url(&std::env::var("MOLBERT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned()));
        let token_path = match std::env::var_os("MOLBERT_TOKEN_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_token_path()?,
        };
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("MOLBERT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("MOLBERT_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { api_url, token_path, timeouts })
    }

    /// Replace the API origin, normalizing it the same way as the env value.
    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_url(api_url);
        self
    }
}

/// `<config dir>/molbert/storage.json`.
///
/// # Errors
///
/// Fails when the platform reports no config directory.
pub fn default_token_path() -> Result<PathBuf, StudioError> {
    dirs::config_dir()
        .map(|dir| dir.join("molbert").join("storage.json"))
        .ok_or_else(|| StudioError::Config("no config directory; set MOLBERT_TOKEN_PATH".to_owned()))
}

pub(crate) fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
