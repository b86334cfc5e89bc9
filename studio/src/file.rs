//! In-memory files exchanged with the image service.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::io::Cursor;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use mask::Size;

use crate::error::StudioError;

pub const DEFAULT_MIME: &str = "image/png";
pub const DEFAULT_EXTENSION: &str = "png";

/// A named blob with a MIME type: an upload source or a generated result.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl LocalFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), mime: mime.into(), bytes }
    }

    /// Read a file from disk, guessing the MIME type from the content.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, StudioError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
        let mime = sniff_mime(&bytes).unwrap_or("application/octet-stream").to_owned();
        Ok(Self { name, mime, bytes })
    }

    /// Wrap a downloaded body the way the studio names generated files.
    ///
    /// The extension is the subtype of `content_type` (`image/webp` gives
    /// `webp`), `png` when absent. The name keeps `base` if it already ends
    /// with that extension, otherwise appends `.<ext>`.
    #[must_use]
    pub fn from_download(base: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or_default().trim())
            .filter(|ct| !ct.is_empty());
        let ext = mime
            .and_then(|ct| ct.split('/').nth(1))
            .filter(|sub| !sub.is_empty())
            .unwrap_or(DEFAULT_EXTENSION);
        let name = if base.ends_with(ext) { base.to_owned() } else { format!("{base}.{ext}") };
        Self { name, mime: mime.unwrap_or(DEFAULT_MIME).to_owned(), bytes }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pixel dimensions read from the image header.
    ///
    /// # Errors
    ///
    /// Fails when the bytes are not a decodable image format.
    pub fn natural_size(&self) -> Result<Size, StudioError> {
        let (width, height) = image::ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(Size::new(f64::from(width), f64::from(height)))
    }

    /// Write the bytes to `dir/<name>` and return the full path.
    ///
    /// # Errors
    ///
    /// Fails on filesystem errors.
    pub fn save_to(&self, dir: &Path) -> Result<std::path::PathBuf, StudioError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `<prefix>-<unix millis>`, the base name of a generated file.
#[must_use]
pub fn timestamped_name(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("{prefix}-{millis}")
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    Some(format.to_mime_type())
}
