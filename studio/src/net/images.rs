//! Image service: generation, result download and history.
//!
//! Every generation call follows one flow:
//!
//! 1. validate the request locally (no network on failure)
//! 2. POST the multipart form to the operation endpoint
//! 3. require a non-empty `file_url` in the JSON answer
//! 4. GET the resolved link and wrap the body as a [`LocalFile`]

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use mask::Hotspot;

use super::client::ApiClient;
use super::types::{FileResult, GenerationEntry};
use crate::error::StudioError;
use crate::file::{LocalFile, timestamped_name};
use crate::request::{GenerationParams, GenerationRequest};

pub const HISTORY_LIMIT: u32 = 20;

impl ApiClient {
    /// Run one generation call end to end and return the produced file.
    ///
    /// # Errors
    ///
    /// - [`StudioError::Validation`] before dispatch for incomplete requests
    /// - [`StudioError::Http`] / [`StudioError::ApiStatus`] from the POST
    /// - [`StudioError::MissingFileUrl`] when the answer has no link
    /// - [`StudioError::DownloadFailed`] when the link cannot be fetched
    pub async fn generate(&self, request: GenerationRequest) -> Result<LocalFile, StudioError> {
        request.validate()?;
        let endpoint = request.endpoint();
        let prefix = request.file_prefix();
        let form = request.into_form()?;

        tracing::info!(op = prefix, endpoint, "generation requested");
        let builder = self.authorize(self.http.post(self.url(endpoint)).multipart(form))?;
        let result: FileResult = self.send_json(prefix, builder).await?;

        let file_url = result
            .file_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(StudioError::MissingFileUrl)?;
        self.download(&self.resolve_file_url(&file_url), &timestamped_name(prefix))
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::generate`].
    pub async fn text_to_image(&self, prompt: &str, params: GenerationParams) -> Result<LocalFile, StudioError> {
        self.generate(GenerationRequest::TextToImage { prompt: prompt.to_owned(), params })
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::generate`].
    pub async fn edit_image(
        &self,
        file: LocalFile,
        prompt: &str,
        hotspot: Hotspot,
        params: GenerationParams,
    ) -> Result<LocalFile, StudioError> {
        self.generate(GenerationRequest::Edit { file, prompt: prompt.to_owned(), hotspot, params })
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::generate`].
    pub async fn compose_images(
        &self,
        files: Vec<LocalFile>,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<LocalFile, StudioError> {
        self.generate(GenerationRequest::Compose { files, prompt: prompt.to_owned(), params })
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::generate`].
    pub async fn filter_image(&self, file: LocalFile, prompt: &str) -> Result<LocalFile, StudioError> {
        self.generate(GenerationRequest::Filter { file, prompt: prompt.to_owned() })
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::generate`].
    pub async fn adjust_image(&self, file: LocalFile, prompt: &str) -> Result<LocalFile, StudioError> {
        self.generate(GenerationRequest::Adjust { file, prompt: prompt.to_owned() })
            .await
    }

    /// Fetch `url` without credentials and name the result after `base_name`.
    ///
    /// # Errors
    ///
    /// [`StudioError::DownloadFailed`] on a non-2xx status,
    /// [`StudioError::Http`] on transport failure.
    pub async fn download(&self, url: &str, base_name: &str) -> Result<LocalFile, StudioError> {
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::warn!(url, status, "download failed");
            return Err(StudioError::DownloadFailed { status });
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?.to_vec();
        let file = LocalFile::from_download(base_name, content_type.as_deref(), bytes);
        tracing::info!(name = %file.name, bytes = file.len(), "generated file downloaded");
        Ok(file)
    }

    /// Latest generations, newest first, with links made fetchable.
    ///
    /// # Errors
    ///
    /// Transport and status errors from the history endpoint.
    pub async fn history(&self, limit: u32) -> Result<Vec<GenerationEntry>, StudioError> {
        let builder = self
            .authorize(self.http.get(self.url("/api/v1/images/history")))?
            .query(&[("limit", limit)]);
        let mut entries: Vec<GenerationEntry> = self.send_json("history", builder).await?;
        for entry in &mut entries {
            entry.file_url = self.resolve_file_url(&entry.file_url);
        }
        Ok(entries)
    }
}
