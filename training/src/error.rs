//! Portal errors.

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    /// Input rejected before any request.
    #[error("{0}")]
    Validation(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    /// The upload endpoint answered without a `file_url`.
    #[error("upload did not return a file link")]
    MissingFileUrl,

    /// A quiz or chat operation was attempted in the wrong state.
    #[error("{0}")]
    InvalidState(&'static str),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse failed: {0}")]
    Config(String),
}

impl TrainingError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The one line a page shows for this error.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::InvalidState(message) => (*message).to_owned(),
            Self::ApiStatus { status, .. } => format!("Request failed ({status})"),
            Self::Http(_) => "Could not reach the server".to_owned(),
            other => other.to_string(),
        }
    }
}
