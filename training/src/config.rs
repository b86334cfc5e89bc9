//! Portal configuration parsed from environment variables.

use super::error::TrainingError;

pub const DEFAULT_API_URL: &str = "https://app.base44.com";
pub const DEFAULT_AGENT_NAME: &str = "safety_consultant";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for TrainingTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingConfig {
    pub api_url: String,
    pub app_id: String,
    pub api_token: Option<String>,
    pub agent_name: String,
    pub timeouts: TrainingTimeouts,
}

impl TrainingConfig {
    /// Build typed portal config from environment variables.
    ///
    /// Required:
    /// - `TRAINING_APP_ID`
    ///
    /// Optional:
    /// - `TRAINING_API_URL`: default `https://app.base44.com`
    /// - `TRAINING_API_TOKEN`: bearer token for the entity store
    /// - `TRAINING_AGENT_NAME`: default `safety_consultant`
    /// - `TRAINING_REQUEST_TIMEOUT_SECS`: default 60
    /// - `TRAINING_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::Config`] when the app id is missing or blank.
    pub fn from_env() -> Result<Self, TrainingError> {
        Self::from_env_with_app_id(None)
    }

    /// [`Self::from_env`], with `app_id` taking precedence over `TRAINING_APP_ID`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::Config`] when neither source gives a non-blank app id.
    pub fn from_env_with_app_id(app_id: Option<&str>) -> Result<Self, TrainingError> {
        let app_id = app_id
            .map(str::to_owned)
            .or_else(|| std::env::var("TRAINING_APP_ID").ok())
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TrainingError::Config("TRAINING_APP_ID is not set".to_owned()))?;
        let api_url = std::env::var("TRAINING_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();
        let api_token = std::env::var("TRAINING_API_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let agent_name = std::env::var("TRAINING_AGENT_NAME").unwrap_or_else(|_| DEFAULT_AGENT_NAME.to_owned());
        let timeouts = TrainingTimeouts {
            request_secs: env_parse_u64("TRAINING_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("TRAINING_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { api_url, app_id, api_token, agent_name, timeouts })
    }

    /// Config for `app_id` at `api_url` with every other field defaulted.
    #[must_use]
    pub fn new(api_url: &str, app_id: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            app_id: app_id.to_owned(),
            api_token: None,
            agent_name: DEFAULT_AGENT_NAME.to_owned(),
            timeouts: TrainingTimeouts::default(),
        }
    }
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
