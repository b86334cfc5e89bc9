//! Studio errors.
//!
//! ERROR HANDLING
//! ==============
//! Four kinds reach the user, and each collapses to one displayable message
//! via [`StudioError::display_message`]:
//!
//! - validation failures, caught before any request is sent
//! - transport and HTTP status failures from the backend
//! - a well-formed generation response that carries no `file_url`
//! - a failed download of the generated file
//!
//! Nothing is retried; callers show the message and return to idle.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors produced by studio operations.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Input rejected before dispatch (missing prompt, missing file, bad email...).
    #[error("{0}")]
    Validation(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server returned {status}: {detail}")]
    ApiStatus { status: u16, detail: String },

    /// A generation call succeeded but the body had no `file_url`.
    #[error("server did not return a file link")]
    MissingFileUrl,

    /// Fetching the generated file failed.
    #[error("failed to download file ({status})")]
    DownloadFailed { status: u16 },

    /// A protected call was made without a stored token.
    #[error("not signed in")]
    Unauthenticated,

    /// Image bytes could not be decoded.
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// Reading or writing local files failed.
    #[error("io failed: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON payload could not be encoded or decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or malformed.
    #[error("config parse failed: {0}")]
    Config(String),
}

impl StudioError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build an [`StudioError::ApiStatus`] from a raw error body.
    ///
    /// FastAPI puts the reason in `{"detail": "..."}`; that string is used
    /// when present, otherwise the trimmed body, otherwise a generic phrase.
    pub(crate) fn api_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() { "request failed".to_owned() } else { trimmed.to_owned() }
            });
        Self::ApiStatus { status, detail }
    }

    /// HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiStatus { status, .. } | Self::DownloadFailed { status } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error was raised before any network call.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The single human-readable line a view shows for this error.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::ApiStatus { status, detail } => format!("Error {status}: {detail}"),
            Self::Http(_) => "Could not reach the server".to_owned(),
            other => other.to_string(),
        }
    }
}
