//! Claim change notifications.
//!
//! Every mutation performed through [`crate::ClaimDesk`] publishes a
//! [`ClaimEvent`] so front ends can refresh without polling storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::claim::{Claim, DisplayStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimEventKind {
    Created,
    Deleted,
    MediaAttached,
    MediaRemoved,
    SummaryUpdated,
    AssessmentUpdated,
    Submitted,
    Approved,
    Rejected,
}

impl std::fmt::Display for ClaimEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimEventKind::Created => write!(f, "Created"),
            ClaimEventKind::Deleted => write!(f, "Deleted"),
            ClaimEventKind::MediaAttached => write!(f, "Media attached"),
            ClaimEventKind::MediaRemoved => write!(f, "Media removed"),
            ClaimEventKind::SummaryUpdated => write!(f, "Summary updated"),
            ClaimEventKind::AssessmentUpdated => write!(f, "Assessment updated"),
            ClaimEventKind::Submitted => write!(f, "Submitted for review"),
            ClaimEventKind::Approved => write!(f, "Approved"),
            ClaimEventKind::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimEvent {
    pub claim_id: String,
    pub kind: ClaimEventKind,
    /// Status after the change. Absent for deletions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DisplayStatus>,
    /// Media file involved, for media events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ClaimEvent {
    pub fn for_claim(claim: &Claim, kind: ClaimEventKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            claim_id: claim.id.clone(),
            kind,
            status: Some(claim.display_status()),
            file_id: None,
            timestamp,
        }
    }

    pub fn deleted(claim_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            claim_id: claim_id.to_string(),
            kind: ClaimEventKind::Deleted,
            status: None,
            file_id: None,
            timestamp,
        }
    }

    pub fn with_file(mut self, file_id: &str) -> Self {
        self.file_id = Some(file_id.to_string());
        self
    }
}

#[derive(Clone)]
pub struct ClaimEventBroadcaster {
    sender: Arc<broadcast::Sender<ClaimEvent>>,
}

impl ClaimEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: ClaimEvent) {
        log::debug!("Claim {}: {}", event.claim_id, event.kind);
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClaimEvent> {
        self.sender.subscribe()
    }
}

impl Default for ClaimEventBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

impl std::fmt::Debug for ClaimEventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimEventBroadcaster")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
