//! `data:<content-type>;base64,<bytes>` payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::MediaError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content_type = content_type.into();
        let content_type = if content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE.to_string()
        } else {
            content_type.trim().to_string()
        };
        Self {
            content_type,
            bytes,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }

    pub fn parse(uri: &str) -> Result<Self, MediaError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| MediaError::InvalidDataUri("missing 'data:' prefix".to_string()))?;
        let (header, body) = rest
            .split_once(',')
            .ok_or_else(|| MediaError::InvalidDataUri("missing ',' separator".to_string()))?;
        let content_type = header.strip_suffix(";base64").ok_or_else(|| {
            MediaError::InvalidDataUri("only base64 payloads are supported".to_string())
        })?;
        let bytes = STANDARD
            .decode(body)
            .map_err(|e| MediaError::InvalidDataUri(e.to_string()))?;

        Ok(Self::new(content_type, bytes))
    }
}

/// Short description of a payload for log lines, never the payload itself.
pub fn payload_summary(uri: &str) -> String {
    let header = uri
        .split_once(',')
        .map(|(header, _)| header)
        .unwrap_or("<opaque>");
    format!("{} ({} chars)", header, uri.len())
}
