//! Generation modes, parameters and request payloads.
//!
//! A [`GenerationRequest`] is built per submit and consumed by the client.
//! Each variant knows its endpoint, the name prefix of the file it yields,
//! and the multipart form it encodes to.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use std::fmt;
use std::str::FromStr;

use mask::Hotspot;
use reqwest::multipart::{Form, Part};

use crate::error::StudioError;
use crate::file::LocalFile;

// ── Validation messages ──────────────────────────────────────────
pub const ERR_EMPTY_PROMPT: &str = "Enter a prompt";
pub const ERR_NO_IMAGE: &str = "Upload an image first";
pub const ERR_NO_COMPOSE_IMAGES: &str = "Upload at least one image first";
pub const ERR_VIDEO_UNAVAILABLE: &str = "Video generation is not available yet";

/// Studio tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    CreateImage,
    EditImage,
    ComposeImage,
    /// Placeholder tab; never dispatches.
    CreateVideo,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::CreateImage, Mode::EditImage, Mode::ComposeImage, Mode::CreateVideo];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateImage => "create-image",
            Self::EditImage => "edit-image",
            Self::ComposeImage => "compose-image",
            Self::CreateVideo => "create-video",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateImage => "Create Image",
            Self::EditImage => "Edit Image",
            Self::ComposeImage => "Compose Image",
            Self::CreateVideo => "Create Video (stub)",
        }
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        self != Self::CreateVideo
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| StudioError::validation(format!("unknown mode: {s}")))
    }
}

/// Output shaping fields shared by text-to-image, edit and compose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub aspect_ratio: String,
    pub output_format: String,
    pub resolution: String,
}

impl GenerationParams {
    /// Text-to-image defaults: square 1K PNG.
    #[must_use]
    pub fn text_defaults() -> Self {
        Self { aspect_ratio: "1:1".to_owned(), output_format: "png".to_owned(), resolution: "1K".to_owned() }
    }

    /// Edit and compose defaults: keep the source aspect ratio.
    #[must_use]
    pub fn edit_defaults() -> Self {
        Self { aspect_ratio: "auto".to_owned(), ..Self::text_defaults() }
    }
}

/// One generation call, ready to encode.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    TextToImage { prompt: String, params: GenerationParams },
    Edit { file: LocalFile, prompt: String, hotspot: Hotspot, params: GenerationParams },
    Compose { files: Vec<LocalFile>, prompt: String, params: GenerationParams },
    Filter { file: LocalFile, prompt: String },
    Adjust { file: LocalFile, prompt: String },
}

impl GenerationRequest {
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::TextToImage { .. } => "/api/v1/images/text-to-image",
            Self::Edit { .. } => "/api/v1/images/edit",
            Self::Compose { .. } => "/api/v1/images/compose",
            Self::Filter { .. } => "/api/v1/images/filter",
            Self::Adjust { .. } => "/api/v1/images/adjust",
        }
    }

    /// Base of the result file name, before the timestamp.
    #[must_use]
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::TextToImage { .. } => "image",
            Self::Edit { .. } => "edit",
            Self::Compose { .. } => "compose",
            Self::Filter { .. } => "filter",
            Self::Adjust { .. } => "adjust",
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::TextToImage { prompt, .. }
            | Self::Edit { prompt, .. }
            | Self::Compose { prompt, .. }
            | Self::Filter { prompt, .. }
            | Self::Adjust { prompt, .. } => prompt,
        }
    }

    /// Reject payloads the backend would refuse, without any network call.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Validation`] for a blank prompt, an empty
    /// source file, or a compose call with no files.
    pub fn validate(&self) -> Result<(), StudioError> {
        if self.prompt().trim().is_empty() {
            return Err(StudioError::validation(ERR_EMPTY_PROMPT));
        }
        match self {
            Self::Edit { file, .. } | Self::Filter { file, .. } | Self::Adjust { file, .. } if file.is_empty() => {
                Err(StudioError::validation(ERR_NO_IMAGE))
            }
            Self::Compose { files, .. } if files.is_empty() || files.iter().any(LocalFile::is_empty) => {
                Err(StudioError::validation(ERR_NO_COMPOSE_IMAGES))
            }
            _ => Ok(()),
        }
    }

    /// Non-file form fields in the order they are sent.
    #[must_use]
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("prompt", self.prompt().to_owned())];
        match self {
            Self::TextToImage { params, .. } => {
                fields.push(("aspect_ratio", params.aspect_ratio.clone()));
                fields.push(("resolution", params.resolution.clone()));
                fields.push(("output_format", params.output_format.clone()));
            }
            Self::Edit { hotspot, params, .. } => {
                fields.push(("x", hotspot.x.to_string()));
                fields.push(("y", hotspot.y.to_string()));
                push_edit_params(&mut fields, params);
            }
            Self::Compose { params, .. } => push_edit_params(&mut fields, params),
            Self::Filter { .. } | Self::Adjust { .. } => {}
        }
        fields
    }

    /// Encode as a multipart form: file parts first, then text fields.
    ///
    /// # Errors
    ///
    /// Fails when a file carries a MIME type reqwest cannot parse.
    pub fn into_form(self) -> Result<Form, StudioError> {
        let fields = self.text_fields();
        let mut form = Form::new();
        match self {
            Self::Edit { file, .. } | Self::Filter { file, .. } | Self::Adjust { file, .. } => {
                form = form.part("file", file_part(file)?);
            }
            Self::Compose { files, .. } => {
                for file in files {
                    form = form.part("files", file_part(file)?);
                }
            }
            Self::TextToImage { .. } => {}
        }
        for (name, value) in fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

fn push_edit_params(fields: &mut Vec<(&'static str, String)>, params: &GenerationParams) {
    fields.push(("aspect_ratio", params.aspect_ratio.clone()));
    fields.push(("output_format", params.output_format.clone()));
    fields.push(("resolution", params.resolution.clone()));
}

fn file_part(file: LocalFile) -> Result<Part, StudioError> {
    Ok(Part::bytes(file.bytes).file_name(file.name).mime_str(&file.mime)?)
}
