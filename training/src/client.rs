//! HTTP client for the portal backend.
//!
//! DESIGN
//! ======
//! All routes hang off `{api_url}/api/apps/{app_id}`. Entity collections are
//! generic over [`Entity`]: one `list`/`filter`/`create`/`update` set serves
//! every record type. A bearer token is attached only when configured, and
//! every non-2xx answer becomes [`TrainingError::ApiStatus`].

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, Conversation, ConversationMetadata, NewMessage};
use crate::config::TrainingConfig;
use crate::entities::{Entity, TrainingUser};
use crate::error::TrainingError;

/// A file held in memory before upload.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    #[serde(default)]
    file_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateConversation<'a> {
    agent_name: &'a str,
    metadata: &'a ConversationMetadata,
}

#[derive(Debug, Clone)]
pub struct TrainingClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    agent_name: String,
}

impl TrainingClient {
    /// # Errors
    ///
    /// Returns [`TrainingError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &TrainingConfig) -> Result<Self, TrainingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;
        let base_url = format!("{}/api/apps/{}", config.api_url.trim_end_matches('/'), config.app_id);
        Ok(Self { http, base_url, token: config.api_token.clone(), agent_name: config.agent_name.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Agent that new consultant conversations are opened with.
    #[must_use]
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ===== ENTITIES =====

    /// Every record of `E`, ordered by `sort` (`-field` for descending).
    ///
    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn list<E: Entity>(&self, sort: Option<&str>) -> Result<Vec<E>, TrainingError> {
        let mut builder = self.http.get(self.url(&format!("entities/{}", E::NAME)));
        if let Some(sort) = sort {
            builder = builder.query(&[("sort", sort)]);
        }
        self.send_json(E::NAME, builder).await
    }

    /// Records of `E` whose fields equal those in `query`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn filter<E: Entity>(
        &self,
        query: &serde_json::Value,
        sort: Option<&str>,
    ) -> Result<Vec<E>, TrainingError> {
        let q = serde_json::to_string(query)?;
        let mut params = vec![("q", q.as_str())];
        if let Some(sort) = sort {
            params.push(("sort", sort));
        }
        let builder = self.http.get(self.url(&format!("entities/{}", E::NAME))).query(&params);
        self.send_json(E::NAME, builder).await
    }

    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn create<E: Entity, B: Serialize + Sync>(&self, body: &B) -> Result<E, TrainingError> {
        let builder = self.http.post(self.url(&format!("entities/{}", E::NAME))).json(body);
        self.send_json(E::NAME, builder).await
    }

    /// Replace the given fields of record `id`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn update<E: Entity, B: Serialize + Sync>(&self, id: &str, body: &B) -> Result<E, TrainingError> {
        let builder = self
            .http
            .put(self.url(&format!("entities/{}/{}", E::NAME, urlencoding::encode(id))))
            .json(body);
        self.send_json(E::NAME, builder).await
    }

    /// The signed-in portal user.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn me(&self) -> Result<TrainingUser, TrainingError> {
        let builder = self.http.get(self.url("entities/User/me"));
        self.send_json("me", builder).await
    }

    // ===== FILES =====

    /// Upload `file` and return the link the backend stored it under.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::MissingFileUrl`] when the answer has no link.
    pub async fn upload_file(&self, file: &Upload) -> Result<String, TrainingError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone()).mime_str(&file.mime)?;
        let form = Form::new().part("file", part);
        let builder = self.http.post(self.url("integration-endpoints/Core/UploadFile")).multipart(form);
        let result: UploadResult = self.send_json("upload_file", builder).await?;
        result.file_url.filter(|url| !url.is_empty()).ok_or(TrainingError::MissingFileUrl)
    }

    // ===== AGENTS =====

    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn create_conversation(
        &self,
        agent_name: &str,
        metadata: &ConversationMetadata,
    ) -> Result<Conversation, TrainingError> {
        let body = CreateConversation { agent_name, metadata };
        let builder = self.http.post(self.url("agents/conversations")).json(&body);
        self.send_json("create_conversation", builder).await
    }

    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn fetch_conversation(&self, conversation_id: &str) -> Result<Conversation, TrainingError> {
        let path = format!("agents/conversations/{}", urlencoding::encode(conversation_id));
        let builder = self.http.get(self.url(&path));
        self.send_json("fetch_conversation", builder).await
    }

    /// # Errors
    ///
    /// Fails on transport errors, error statuses, or undecodable bodies.
    pub async fn add_message(&self, conversation_id: &str, message: &NewMessage) -> Result<ChatMessage, TrainingError> {
        let path = format!("agents/conversations/{}/messages", urlencoding::encode(conversation_id));
        let builder = self.http.post(self.url(&path)).json(message);
        self.send_json("add_message", builder).await
    }

    async fn send_json<T: DeserializeOwned>(&self, op: &str, builder: RequestBuilder) -> Result<T, TrainingError> {
        let response = self.authorize(builder).send().await.inspect_err(|e| {
            tracing::warn!(op, error = %e, "portal request failed");
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            tracing::warn!(op, status, "portal returned error status");
            return Err(TrainingError::ApiStatus { status, body });
        }
        tracing::debug!(op, status, bytes = body.len(), "portal call ok");
        Ok(serde_json::from_str(&body)?)
    }
}
