//! Turning uploads into stored payloads.
//!
//! Still images are downscaled and re-encoded as JPEG before storage. Videos
//! and anything else pass through unchanged with their declared content type.

pub mod data_uri;
pub mod image;

use std::path::Path;

use chrono::Utc;

use crate::claim::MediaKind;
use crate::config::MediaConfig;
use crate::error::MediaError;

pub use data_uri::{payload_summary, DataUri};

/// A file handed in by the submitter, before any processing.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// Source modification time in epoch milliseconds.
    pub last_modified: i64,
}

impl MediaUpload {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
        last_modified: i64,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
            last_modified,
        }
    }

    /// Reads a file from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, MediaError> {
        let bytes = std::fs::read(path).map_err(|e| MediaError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let last_modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(|t| chrono::DateTime::<Utc>::from(t).timestamp_millis())
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            content_type,
            bytes,
            last_modified,
        })
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn is_still_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// An upload ready to be written to the blob store.
#[derive(Debug, Clone)]
pub struct PreparedMedia {
    pub kind: MediaKind,
    /// Data URI stored under the media id.
    pub payload: String,
}

/// Compresses still images and wraps the result as a data URI.
pub fn prepare(upload: &MediaUpload, config: &MediaConfig) -> Result<PreparedMedia, MediaError> {
    if upload.bytes.is_empty() {
        return Err(MediaError::EmptyUpload(upload.name.clone()));
    }

    let data_uri = if upload.is_still_image() {
        let jpeg = image::compress_image(&upload.name, &upload.bytes, config)?;
        DataUri::new(image::JPEG_CONTENT_TYPE, jpeg)
    } else {
        DataUri::new(upload.content_type.clone(), upload.bytes.clone())
    };

    Ok(PreparedMedia {
        kind: upload.kind(),
        payload: data_uri.encode(),
    })
}
