//! Studio page state.
//!
//! DESIGN
//! ======
//! One value owns everything the studio page shows: the active mode, a
//! prompt per mode, the uploaded and generated images, compose extras, the
//! mask painter and the status/error/loading trio. A submit is split into
//! [`StudioState::begin`] (validate and build the request, enter loading)
//! and [`StudioState::finish`] (apply the outcome, leave loading) so a host
//! can await the network call between them without holding a borrow.
//!
//! The image an edit or compose targets is the one on screen: the generated
//! result when present, otherwise the upload. The mask painter always tracks
//! that same image, so the hotspot is in its pixel space.

#[cfg(test)]
#[path = "studio_test.rs"]
mod studio_test;

use std::path::{Path, PathBuf};

use mask::{DisplayRect, Hotspot, MaskPainter};

use crate::error::StudioError;
use crate::file::{LocalFile, timestamped_name};
use crate::net::client::ApiClient;
use crate::request::{
    ERR_EMPTY_PROMPT, ERR_NO_COMPOSE_IMAGES, ERR_NO_IMAGE, ERR_VIDEO_UNAVAILABLE, GenerationParams,
    GenerationRequest, Mode,
};

/// Maximum number of extra images on the compose tab.
pub const MAX_COMPOSE_FILES: usize = 10;

pub const STATUS_SENDING: &str = "Sending request to Molbert API...";

#[derive(Debug, Clone)]
pub struct StudioState {
    mode: Mode,
    image_prompt: String,
    edit_prompt: String,
    compose_prompt: String,
    text_params: GenerationParams,
    edit_params: GenerationParams,
    uploaded: Option<LocalFile>,
    generated: Option<LocalFile>,
    compose_extras: Vec<LocalFile>,
    painter: MaskPainter,
    status: Option<String>,
    error: Option<String>,
    loading: bool,
}

impl StudioState {
    #[must_use]
    pub fn new(container: DisplayRect) -> Self {
        Self {
            mode: Mode::default(),
            image_prompt: String::new(),
            edit_prompt: String::new(),
            compose_prompt: String::new(),
            text_params: GenerationParams::text_defaults(),
            edit_params: GenerationParams::edit_defaults(),
            uploaded: None,
            generated: None,
            compose_extras: Vec::new(),
            painter: MaskPainter::new(container),
            status: None,
            error: None,
            loading: false,
        }
    }

    // =========================================================================
    // INPUTS
    // =========================================================================

    /// Switch tabs. The mask is cleared on every switch.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.painter.mode_changed(mode == Mode::EditImage);
    }

    /// Prompt of the active tab; create and video share one.
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self.mode {
            Mode::CreateImage | Mode::CreateVideo => &self.image_prompt,
            Mode::EditImage => &self.edit_prompt,
            Mode::ComposeImage => &self.compose_prompt,
        }
    }

    pub fn set_prompt(&mut self, value: impl Into<String>) {
        let slot = match self.mode {
            Mode::CreateImage | Mode::CreateVideo => &mut self.image_prompt,
            Mode::EditImage => &mut self.edit_prompt,
            Mode::ComposeImage => &mut self.compose_prompt,
        };
        *slot = value.into();
    }

    /// Replace the output shaping for the active tab.
    pub fn set_params(&mut self, params: GenerationParams) {
        match self.mode {
            Mode::CreateImage | Mode::CreateVideo => self.text_params = params,
            Mode::EditImage | Mode::ComposeImage => self.edit_params = params,
        }
    }

    #[must_use]
    pub fn params(&self) -> &GenerationParams {
        match self.mode {
            Mode::CreateImage | Mode::CreateVideo => &self.text_params,
            Mode::EditImage | Mode::ComposeImage => &self.edit_params,
        }
    }

    /// Use `file` as the working image. Drops any generated result and the mask.
    ///
    /// # Errors
    ///
    /// Rejects non-image files.
    pub fn upload(&mut self, file: LocalFile) -> Result<(), StudioError> {
        if !file.is_image() {
            return Err(StudioError::validation("Only PNG, JPG or WEBP images can be uploaded"));
        }
        self.error = None;
        let natural = file.natural_size().ok();
        self.uploaded = Some(file);
        self.generated = None;
        self.painter.image_changed(natural);
        Ok(())
    }

    /// Append compose images. Non-images are skipped and the total is capped
    /// at [`MAX_COMPOSE_FILES`]. Returns how many were added.
    pub fn add_compose_files(&mut self, files: impl IntoIterator<Item = LocalFile>) -> usize {
        let room = MAX_COMPOSE_FILES.saturating_sub(self.compose_extras.len());
        let before = self.compose_extras.len();
        self.compose_extras
            .extend(files.into_iter().filter(LocalFile::is_image).take(room));
        self.compose_extras.len() - before
    }

    pub fn remove_compose_file(&mut self, index: usize) -> Option<LocalFile> {
        (index < self.compose_extras.len()).then(|| self.compose_extras.remove(index))
    }

    /// Clear prompts, images, extras, messages and the mask.
    pub fn reset_all(&mut self) {
        self.image_prompt.clear();
        self.edit_prompt.clear();
        self.compose_prompt.clear();
        self.uploaded = None;
        self.generated = None;
        self.compose_extras.clear();
        self.status = None;
        self.error = None;
        self.painter.image_changed(None);
    }

    // =========================================================================
    // SUBMIT
    // =========================================================================

    /// Whether the run button is enabled.
    #[must_use]
    pub fn can_start(&self) -> bool {
        let has_prompt = !self.prompt().trim().is_empty();
        match self.mode {
            Mode::CreateImage | Mode::CreateVideo => has_prompt,
            Mode::EditImage => has_prompt && self.base_image().is_some(),
            Mode::ComposeImage => {
                has_prompt && (self.base_image().is_some() || !self.compose_extras.is_empty())
            }
        }
    }

    /// Build the request for the active tab without touching the network.
    ///
    /// # Errors
    ///
    /// [`StudioError::Validation`] when inputs are incomplete or the tab is
    /// not available.
    pub fn build_request(&self) -> Result<GenerationRequest, StudioError> {
        let prompt = self.prompt().trim().to_owned();
        if self.mode == Mode::CreateVideo {
            return Err(StudioError::validation(ERR_VIDEO_UNAVAILABLE));
        }
        if prompt.is_empty() {
            return Err(StudioError::validation(ERR_EMPTY_PROMPT));
        }
        let request = match self.mode {
            Mode::CreateImage => GenerationRequest::TextToImage { prompt, params: self.text_params.clone() },
            Mode::EditImage => {
                let file = self.base_image().cloned().ok_or_else(|| StudioError::validation(ERR_NO_IMAGE))?;
                GenerationRequest::Edit { file, prompt, hotspot: self.hotspot(), params: self.edit_params.clone() }
            }
            Mode::ComposeImage => {
                let mut files = self.compose_extras.clone();
                files.extend(self.base_image().cloned());
                if files.is_empty() {
                    return Err(StudioError::validation(ERR_NO_COMPOSE_IMAGES));
                }
                GenerationRequest::Compose { files, prompt, params: self.edit_params.clone() }
            }
            Mode::CreateVideo => return Err(StudioError::validation(ERR_VIDEO_UNAVAILABLE)),
        };
        request.validate()?;
        Ok(request)
    }

    /// Enter loading and hand out the request to send.
    ///
    /// # Errors
    ///
    /// Fails while another request is running, or with the validation error
    /// from [`StudioState::build_request`], which is also stored for display.
    pub fn begin(&mut self) -> Result<GenerationRequest, StudioError> {
        if self.loading {
            return Err(StudioError::validation("A request is already running"));
        }
        let request = self.build_request().inspect_err(|e| {
            self.error = Some(e.display_message());
        })?;
        self.loading = true;
        self.error = None;
        self.status = Some(STATUS_SENDING.to_owned());
        Ok(request)
    }

    /// Apply the outcome of the request started by [`StudioState::begin`] and
    /// return to idle.
    ///
    /// # Errors
    ///
    /// Passes a failed outcome through after storing its message.
    pub fn finish(&mut self, outcome: Result<LocalFile, StudioError>) -> Result<(), StudioError> {
        self.loading = false;
        match outcome {
            Ok(file) => {
                self.status = Some(done_status(self.mode).to_owned());
                if self.mode == Mode::ComposeImage {
                    self.compose_extras.clear();
                }
                self.generated = Some(file);
                let natural = self.base_image().and_then(|base| base.natural_size().ok());
                self.painter.image_changed(natural);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(mode = %self.mode, error = %e, "generation failed");
                self.status = None;
                self.error = Some(e.display_message());
                Err(e)
            }
        }
    }

    /// Validate, send through `client`, and apply the result.
    ///
    /// # Errors
    ///
    /// Any error from building, sending or downloading; the message is also
    /// stored in [`StudioState::error`].
    pub async fn submit(&mut self, client: &ApiClient) -> Result<(), StudioError> {
        let request = self.begin()?;
        let outcome = client.generate(request).await;
        self.finish(outcome)
    }

    /// Save the image on screen as `molbert-<millis>.<ext>` under `dir`.
    ///
    /// # Errors
    ///
    /// Validation error when nothing is displayed; IO errors otherwise.
    pub fn export(&self, dir: &Path) -> Result<PathBuf, StudioError> {
        let shown = self.displayed_image().ok_or_else(|| StudioError::validation(ERR_NO_IMAGE))?;
        let ext = shown.name.rsplit_once('.').map_or("png", |(_, ext)| ext);
        let file = LocalFile::new(format!("{}.{ext}", timestamped_name("molbert")), shown.mime.clone(), shown.bytes.clone());
        file.save_to(dir)
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The image on screen: the generated result, else the upload.
    #[must_use]
    pub fn displayed_image(&self) -> Option<&LocalFile> {
        self.generated.as_ref().or(self.uploaded.as_ref())
    }

    /// The image edit and compose send: the upload, else the last result.
    /// The mask hotspot is in this image's pixels.
    #[must_use]
    pub fn base_image(&self) -> Option<&LocalFile> {
        self.uploaded.as_ref().or(self.generated.as_ref())
    }

    #[must_use]
    pub fn uploaded(&self) -> Option<&LocalFile> {
        self.uploaded.as_ref()
    }

    #[must_use]
    pub fn generated(&self) -> Option<&LocalFile> {
        self.generated.as_ref()
    }

    #[must_use]
    pub fn compose_extras(&self) -> &[LocalFile] {
        &self.compose_extras
    }

    #[must_use]
    pub fn compose_full(&self) -> bool {
        self.compose_extras.len() >= MAX_COMPOSE_FILES
    }

    #[must_use]
    pub fn hotspot(&self) -> Hotspot {
        self.painter.hotspot()
    }

    #[must_use]
    pub fn painter(&self) -> &MaskPainter {
        &self.painter
    }

    /// Pointer events and brush toggles go straight to the painter.
    pub fn painter_mut(&mut self) -> &mut MaskPainter {
        &mut self.painter
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

fn done_status(mode: Mode) -> &'static str {
    match mode {
        Mode::EditImage => "Image adjusted",
        Mode::ComposeImage => "Image composed",
        Mode::CreateImage | Mode::CreateVideo => "Image ready",
    }
}
