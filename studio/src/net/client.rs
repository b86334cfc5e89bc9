//! Shared HTTP plumbing for the Molbert API.
//!
//! Every operation is a single request/response call. The client attaches
//! `Authorization: Bearer <token>` whenever a token is stored, maps non-2xx
//! answers to [`StudioError::ApiStatus`], and never retries.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::config::{StudioConfig, normalize_url};
use crate::error::StudioError;
use crate::token::TokenStore;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`StudioError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &StudioConfig) -> Result<Self, StudioError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;
        Ok(Self { http, base_url: normalize_url(&config.api_url), tokens: TokenStore::new(&config.token_path) })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub(crate) fn url(&self, path: &str) -> String {
        join_origin(&self.base_url, path)
    }

    /// Turn a `file_url` from the API into something fetchable.
    #[must_use]
    pub fn resolve_file_url(&self, file_url: &str) -> String {
        resolve_file_url(&self.base_url, file_url)
    }

    /// Attach the stored bearer token, if any.
    pub(crate) fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, StudioError> {
        Ok(match self.tokens.load()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Attach the stored bearer token, failing without one.
    pub(crate) fn authorize_required(&self, builder: RequestBuilder) -> Result<RequestBuilder, StudioError> {
        let token = self.tokens.load()?.ok_or(StudioError::Unauthenticated)?;
        Ok(builder.bearer_auth(token))
    }

    /// Send and decode a JSON body, mapping error statuses.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, op: &str, builder: RequestBuilder) -> Result<T, StudioError> {
        let text = self.send_text(op, builder).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send and discard the body, mapping error statuses.
    pub(crate) async fn send_empty(&self, op: &str, builder: RequestBuilder) -> Result<(), StudioError> {
        self.send_text(op, builder).await.map(drop)
    }

    async fn send_text(&self, op: &str, builder: RequestBuilder) -> Result<String, StudioError> {
        let response = builder.send().await.inspect_err(|e| {
            tracing::warn!(op, error = %e, "request failed");
        })?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        if !(200..300).contains(&status) {
            tracing::warn!(op, status, "api returned error status");
            return Err(StudioError::api_status(status, &text));
        }
        tracing::debug!(op, status, bytes = text.len(), "api call ok");
        Ok(text)
    }
}

/// Absolute `http://`/`https://` links pass through; anything else is joined
/// to `origin` with exactly one `/` between them.
#[must_use]
pub fn resolve_file_url(origin: &str, file_url: &str) -> String {
    if file_url.starts_with("http://") || file_url.starts_with("https://") {
        return file_url.to_owned();
    }
    join_origin(origin, file_url)
}

fn join_origin(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{origin}/{path}")
}
