//! Claim data model.
//!
//! A [`Claim`] is the aggregate root of the system. It carries the claim
//! metadata, the ordered list of [`MediaFile`] descriptors (payloads live in
//! the blob store), the free-text summary and assessment, and the lifecycle
//! fields. Field names serialize in camelCase so stored collections keep the
//! same shape as the browser-era records.

mod ids;
pub mod lifecycle;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use ids::{IdGenerator, UuidIdGenerator, CLAIM_ID_PREFIX};
pub use lifecycle::display_status;

/// Kind of evidence a media file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Derives the kind from an upload's declared content type.
    ///
    /// Anything that is not `video/*` is treated as an image.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("video/")
        {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor of one uploaded media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    /// Unique file identifier, also the blob store key.
    pub id: String,
    /// Original filename.
    pub name: String,
    /// Image or video.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Size in bytes of the original upload, before any compression.
    pub size: u64,
    /// Source modification time in epoch milliseconds.
    pub last_modified: i64,
}

/// Persisted claim status.
///
/// `Pending` is never stored: it is only ever a projection of
/// `submitted = true`, see [`DisplayStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::New => "New",
            ClaimStatus::InProgress => "In Progress",
            ClaimStatus::Completed => "Completed",
            ClaimStatus::Rejected => "Rejected",
        }
    }

    /// Completed and Rejected have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Completed | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status as shown to users. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DisplayStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Pending,
    Completed,
    Rejected,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::New => "New",
            DisplayStatus::InProgress => "In Progress",
            DisplayStatus::Pending => "Pending",
            DisplayStatus::Completed => "Completed",
            DisplayStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An insurance damage claim and its full workflow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: String,
    pub customer_name: String,
    pub description: String,
    /// Creation time.
    pub date: DateTime<Utc>,
    pub status: ClaimStatus,
    /// Evidence in display order.
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub assessment: String,
    /// True exactly while the claim awaits approver action.
    #[serde(default)]
    pub submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl Claim {
    /// Creates a new claim in the `New` state.
    ///
    /// Both `customer_name` and `description` must contain non-whitespace
    /// text; they are stored trimmed.
    pub fn new(
        id: impl Into<String>,
        customer_name: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(ValidationError::BlankField {
                field: "customerName",
            });
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::BlankField {
                field: "description",
            });
        }

        Ok(Self {
            id: id.into(),
            customer_name: customer_name.to_string(),
            description: description.to_string(),
            date: now,
            status: ClaimStatus::New,
            media_files: Vec::new(),
            summary: String::new(),
            assessment: String::new(),
            submitted: false,
            submitted_at: None,
            approved_at: None,
            rejected_at: None,
        })
    }

    /// Status shown to users: `Pending` while submitted.
    pub fn display_status(&self) -> DisplayStatus {
        display_status(self.status, self.submitted)
    }

    pub fn media_file(&self, file_id: &str) -> Option<&MediaFile> {
        self.media_files.iter().find(|m| m.id == file_id)
    }

    pub fn has_media_file(&self, file_id: &str) -> bool {
        self.media_file(file_id).is_some()
    }

    /// Appends a descriptor. Returns false (and leaves the claim untouched)
    /// if a file with the same id is already attached.
    pub fn attach_media(&mut self, file: MediaFile) -> bool {
        if self.has_media_file(&file.id) {
            return false;
        }
        self.media_files.push(file);
        true
    }

    /// Removes a descriptor, returning it if it was attached.
    pub fn detach_media(&mut self, file_id: &str) -> Option<MediaFile> {
        let position = self.media_files.iter().position(|m| m.id == file_id)?;
        Some(self.media_files.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn media(id: &str) -> MediaFile {
        MediaFile {
            id: id.to_string(),
            name: format!("{}.jpg", id),
            kind: MediaKind::Image,
            size: 1024,
            last_modified: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_new_claim_defaults() {
        let claim = Claim::new("CLM-1", "Jane Doe", "fender bender", now()).unwrap();
        assert_eq!(claim.status, ClaimStatus::New);
        assert!(!claim.submitted);
        assert!(claim.media_files.is_empty());
        assert!(claim.summary.is_empty());
        assert!(claim.assessment.is_empty());
        assert_eq!(claim.date, now());
        assert!(claim.submitted_at.is_none());
    }

    #[test]
    fn test_new_claim_rejects_blank_fields() {
        let err = Claim::new("CLM-1", "   ", "fender bender", now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BlankField {
                field: "customerName"
            }
        );

        let err = Claim::new("CLM-1", "Jane Doe", "", now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BlankField {
                field: "description"
            }
        );
    }

    #[test]
    fn test_media_kind_from_content_type() {
        assert_eq!(MediaKind::from_content_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_content_type("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_content_type("VIDEO/QuickTime"), MediaKind::Video);
        assert_eq!(
            MediaKind::from_content_type("application/pdf"),
            MediaKind::Image
        );
    }

    #[test]
    fn test_attach_rejects_duplicate_ids() {
        let mut claim = Claim::new("CLM-1", "Jane Doe", "fender bender", now()).unwrap();
        assert!(claim.attach_media(media("a")));
        assert!(claim.attach_media(media("b")));
        assert!(!claim.attach_media(media("a")));
        let ids: Vec<_> = claim.media_files.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_detach_preserves_order() {
        let mut claim = Claim::new("CLM-1", "Jane Doe", "fender bender", now()).unwrap();
        claim.attach_media(media("a"));
        claim.attach_media(media("b"));
        claim.attach_media(media("c"));

        let removed = claim.detach_media("b").unwrap();
        assert_eq!(removed.id, "b");
        assert!(claim.detach_media("b").is_none());
        let ids: Vec<_> = claim.media_files.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let mut claim = Claim::new("CLM-1", "Jane Doe", "fender bender", now()).unwrap();
        claim.status = ClaimStatus::InProgress;
        claim.attach_media(media("a"));

        let value = serde_json::to_value(&claim).unwrap();
        assert_eq!(value["customerName"], "Jane Doe");
        assert_eq!(value["status"], "In Progress");
        assert_eq!(value["mediaFiles"][0]["type"], "image");
        assert_eq!(value["mediaFiles"][0]["lastModified"], 1_700_000_000_000_i64);
        assert_eq!(value["submitted"], false);
        assert!(value.get("submittedAt").is_none());
    }

    #[test]
    fn test_deserializes_stored_record() {
        let json = r#"{
            "id": "CLM-482913-K2QZ",
            "customerName": "Jane Doe",
            "date": "2026-03-01T09:30:00.000Z",
            "status": "New",
            "description": "fender bender",
            "mediaFiles": [
                {"id": "f1", "name": "bumper.jpg", "type": "image", "size": 2048, "lastModified": 1700000000000}
            ],
            "summary": "Front bumper dented",
            "assessment": "",
            "submitted": true,
            "submittedAt": "2026-03-02T10:00:00.000Z"
        }"#;
        let claim: Claim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.id, "CLM-482913-K2QZ");
        assert_eq!(claim.media_files.len(), 1);
        assert!(claim.submitted);
        assert!(claim.submitted_at.is_some());
        assert_eq!(claim.display_status(), DisplayStatus::Pending);
    }
}
