//! Bearer token persistence.
//!
//! The token lives in a small JSON object on disk under the fixed key
//! `access_token`, mirroring the single local-storage slot the web studio
//! uses. Other keys in the file are preserved across writes.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::StudioError;

/// Storage key of the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// File-backed key/value store holding the access token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. A missing file or key means no token.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not a JSON object.
    pub fn load(&self) -> Result<Option<String>, StudioError> {
        let map = self.read_map()?;
        Ok(map
            .get(ACCESS_TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_owned))
    }

    /// Whether a non-empty token is stored. Unreadable storage counts as absent.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }

    /// Persist `token`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Fails on filesystem errors or an unparseable existing file.
    pub fn save(&self, token: &str) -> Result<(), StudioError> {
        let mut map = self.read_map()?;
        map.insert(ACCESS_TOKEN_KEY.to_owned(), Value::String(token.to_owned()));
        self.write_map(&map)?;
        tracing::debug!(path = %self.path.display(), "access token stored");
        Ok(())
    }

    /// Remove the token. Clearing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Fails on filesystem errors or an unparseable existing file.
    pub fn clear(&self) -> Result<(), StudioError> {
        let mut map = self.read_map()?;
        if map.remove(ACCESS_TOKEN_KEY).is_some() {
            self.write_map(&map)?;
            tracing::debug!(path = %self.path.display(), "access token cleared");
        }
        Ok(())
    }

    fn read_map(&self) -> Result<Map<String, Value>, StudioError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(StudioError::Config(format!("{} is not a JSON object", self.path.display()))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StudioError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, body)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
