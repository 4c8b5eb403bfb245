//! The claim desk: submitter, approver and detail operations over the stores.
//!
//! Every operation loads a working copy of the claim, applies the change
//! through the lifecycle rules and writes it back through the repository.
//! A failed operation leaves the stored record untouched, with one exception:
//! a media batch keeps the files that were processed successfully.

use std::sync::Arc;

use serde::Serialize;

use crate::assessment::AssessmentGenerator;
use crate::claim::{Claim, IdGenerator, MediaFile, UuidIdGenerator};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, MediaConfig};
use crate::error::{ClaimDeskError, Result, ValidationError};
use crate::events::{ClaimEvent, ClaimEventBroadcaster, ClaimEventKind};
use crate::media::{self, MediaUpload};
use crate::storage::{BlobStore, ClaimRepository, Stores};

/// A single upload that could not be attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of [`ClaimDesk::upload_media`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    /// The claim as stored after the batch.
    pub claim: Claim,
    pub attached: Vec<MediaFile>,
    pub failed: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A media descriptor together with its displayable payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPreview {
    pub file: MediaFile,
    /// Data URI, or `None` when the payload is missing from the blob store.
    pub payload: Option<String>,
}

pub struct ClaimDesk {
    claims: Arc<dyn ClaimRepository>,
    blobs: Arc<dyn BlobStore>,
    assessments: AssessmentGenerator,
    media: MediaConfig,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    events: ClaimEventBroadcaster,
}

impl std::fmt::Debug for ClaimDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimDesk")
            .field("assessments", &self.assessments)
            .field("media", &self.media)
            .finish_non_exhaustive()
    }
}

impl ClaimDesk {
    pub fn new(stores: Stores, assessments: AssessmentGenerator) -> Self {
        Self {
            claims: stores.claims,
            blobs: stores.blobs,
            assessments,
            media: MediaConfig::default(),
            ids: Arc::new(UuidIdGenerator),
            clock: Arc::new(SystemClock),
            events: ClaimEventBroadcaster::default(),
        }
    }

    /// In-memory stores with the mock assessment provider.
    pub fn in_memory() -> Self {
        Self::new(Stores::in_memory(), AssessmentGenerator::default())
    }

    /// Opens the configured stores and assessment provider.
    pub fn from_config(config: &Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let stores = Stores::open_with_clock(&config.storage, clock.clone())?;
        let assessments = AssessmentGenerator::from_config(&config.assessment)?;
        Ok(Self::new(stores, assessments)
            .with_media_config(config.media.clone())
            .with_clock(clock))
    }

    pub fn with_media_config(mut self, media: MediaConfig) -> Self {
        self.media = media;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_events(mut self, events: ClaimEventBroadcaster) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &ClaimEventBroadcaster {
        &self.events
    }

    fn publish(&self, claim: &Claim, kind: ClaimEventKind) {
        self.events
            .send(ClaimEvent::for_claim(claim, kind, self.clock.now()));
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    pub fn create_claim(&self, customer_name: &str, description: &str) -> Result<Claim> {
        let claim = Claim::new(
            self.ids.claim_id(),
            customer_name,
            description,
            self.clock.now(),
        )?;
        self.claims.save(&claim)?;

        log::info!("Created claim {} for {}", claim.id, claim.customer_name);
        self.publish(&claim, ClaimEventKind::Created);
        Ok(claim)
    }

    pub fn list_claims(&self) -> Result<Vec<Claim>> {
        Ok(self.claims.list()?)
    }

    pub fn get_claim(&self, id: &str) -> Result<Option<Claim>> {
        Ok(self.claims.get(id)?)
    }

    pub fn require_claim(&self, id: &str) -> Result<Claim> {
        self.claims
            .get(id)?
            .ok_or_else(|| ClaimDeskError::ClaimNotFound(id.to_string()))
    }

    /// Deletes the claim and its media payloads. Returns false if no claim
    /// had that id.
    pub fn delete_claim(&self, id: &str) -> Result<bool> {
        let Some(claim) = self.claims.get(id)? else {
            return Ok(false);
        };

        self.claims.delete(id)?;
        for file in &claim.media_files {
            if let Err(e) = self.blobs.delete(&file.id) {
                log::warn!(
                    "Claim {} deleted but media payload {} could not be removed: {}",
                    id,
                    file.id,
                    e
                );
            }
        }

        log::info!("Deleted claim {}", id);
        self.events
            .send(ClaimEvent::deleted(id, self.clock.now()));
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Media
    // ------------------------------------------------------------------

    /// Processes each upload on its own. Files that were processed and stored
    /// are attached even when others in the batch fail.
    pub fn upload_media(&self, id: &str, uploads: Vec<MediaUpload>) -> Result<UploadReport> {
        let mut claim = self.require_claim(id)?;
        claim.ensure_editable()?;

        let mut attached = Vec::new();
        let mut failed = Vec::new();

        for upload in uploads {
            let prepared = match media::prepare(&upload, &self.media) {
                Ok(prepared) => prepared,
                Err(e) => {
                    log::warn!("Skipping upload '{}' for claim {}: {}", upload.name, id, e);
                    failed.push(UploadFailure {
                        name: upload.name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let file_id = self.ids.media_id();
            if claim.has_media_file(&file_id) {
                let e = ValidationError::DuplicateMediaId { id: file_id };
                log::warn!("Skipping upload '{}' for claim {}: {}", upload.name, id, e);
                failed.push(UploadFailure {
                    name: upload.name,
                    reason: e.to_string(),
                });
                continue;
            }
            if let Err(e) = self.blobs.put(&file_id, &prepared.payload) {
                log::warn!("Failed to store upload '{}' for claim {}: {}", upload.name, id, e);
                failed.push(UploadFailure {
                    name: upload.name,
                    reason: e.to_string(),
                });
                continue;
            }
            log::debug!(
                "Stored {} as {}: {}",
                upload.name,
                file_id,
                media::payload_summary(&prepared.payload)
            );

            let file = MediaFile {
                id: file_id,
                name: upload.name.clone(),
                kind: prepared.kind,
                size: upload.size(),
                last_modified: upload.last_modified,
            };
            if claim.attach_media(file.clone()) {
                attached.push(file);
            }
        }

        if !attached.is_empty() {
            claim.mark_in_progress();
            if let Err(e) = self.claims.save(&claim) {
                for file in &attached {
                    if let Err(cleanup) = self.blobs.delete(&file.id) {
                        log::warn!(
                            "Could not roll back media payload {} for claim {}: {}",
                            file.id,
                            id,
                            cleanup
                        );
                    }
                }
                return Err(e.into());
            }

            for file in &attached {
                self.events.send(
                    ClaimEvent::for_claim(&claim, ClaimEventKind::MediaAttached, self.clock.now())
                        .with_file(&file.id),
                );
            }
        }

        log::info!(
            "Claim {}: {} media file(s) attached, {} failed",
            id,
            attached.len(),
            failed.len()
        );

        Ok(UploadReport {
            claim,
            attached,
            failed,
        })
    }

    pub fn remove_media(&self, id: &str, file_id: &str) -> Result<Claim> {
        let mut claim = self.require_claim(id)?;
        claim.ensure_editable()?;

        if claim.detach_media(file_id).is_none() {
            return Err(ClaimDeskError::MediaNotFound {
                claim_id: id.to_string(),
                file_id: file_id.to_string(),
            });
        }
        claim.mark_in_progress();
        self.claims.save(&claim)?;

        if let Err(e) = self.blobs.delete(file_id) {
            log::warn!("Media payload {} could not be removed: {}", file_id, e);
        }

        self.events.send(
            ClaimEvent::for_claim(&claim, ClaimEventKind::MediaRemoved, self.clock.now())
                .with_file(file_id),
        );
        Ok(claim)
    }

    pub fn media_payload(&self, file_id: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(file_id)?)
    }

    /// Payloads for every media file of the claim, in claim order.
    pub fn media_previews(&self, id: &str) -> Result<Vec<MediaPreview>> {
        let claim = self.require_claim(id)?;

        claim
            .media_files
            .into_iter()
            .map(|file| {
                let payload = self.blobs.get(&file.id)?;
                if payload.is_none() {
                    log::warn!("Claim {} references missing payload {}", id, file.id);
                }
                Ok::<_, ClaimDeskError>(MediaPreview { file, payload })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Summary and assessment
    // ------------------------------------------------------------------

    pub fn update_summary(&self, id: &str, summary: &str) -> Result<Claim> {
        let mut claim = self.require_claim(id)?;
        claim.ensure_editable()?;

        claim.summary = summary.to_string();
        claim.mark_in_progress();
        self.claims.save(&claim)?;

        self.publish(&claim, ClaimEventKind::SummaryUpdated);
        Ok(claim)
    }

    pub fn update_assessment(&self, id: &str, assessment: &str) -> Result<Claim> {
        let mut claim = self.require_claim(id)?;
        claim.ensure_editable()?;

        claim.assessment = assessment.to_string();
        claim.mark_in_progress();
        self.claims.save(&claim)?;

        self.publish(&claim, ClaimEventKind::AssessmentUpdated);
        Ok(claim)
    }

    /// Advisory text about the attached media. Not persisted.
    pub async fn generate_media_assessment(&self, id: &str) -> Result<String> {
        let claim = self.require_claim(id)?;
        Ok(self.assessments.assess_media(&claim.media_files).await?)
    }

    /// Advisory text about the summary. Not persisted.
    pub async fn generate_summary_assessment(&self, id: &str) -> Result<String> {
        let claim = self.require_claim(id)?;
        Ok(self.assessments.assess_summary(&claim.summary).await?)
    }

    /// Generates the final assessment and stores it on the claim.
    pub async fn generate_final_assessment(&self, id: &str) -> Result<Claim> {
        let claim = self.require_claim(id)?;
        claim.ensure_editable()?;

        let text = self
            .assessments
            .assess_final(&claim.media_files, &claim.summary)
            .await?;

        // Re-read: the record may have changed while the request was in flight.
        let mut claim = self.require_claim(id)?;
        claim.ensure_editable()?;
        claim.assessment = text;
        claim.mark_in_progress();
        self.claims.save(&claim)?;

        log::info!("Stored final assessment for claim {}", id);
        self.publish(&claim, ClaimEventKind::AssessmentUpdated);
        Ok(claim)
    }

    pub fn submit_claim(&self, id: &str) -> Result<Claim> {
        let mut claim = self.require_claim(id)?;
        claim.submit(self.clock.now())?;
        self.claims.save(&claim)?;

        log::info!("Claim {} submitted for review", id);
        self.publish(&claim, ClaimEventKind::Submitted);
        Ok(claim)
    }

    // ------------------------------------------------------------------
    // Approver
    // ------------------------------------------------------------------

    /// Claims awaiting a decision, in storage order.
    pub fn pending_claims(&self) -> Result<Vec<Claim>> {
        Ok(self
            .claims
            .list()?
            .into_iter()
            .filter(Claim::is_pending_review)
            .collect())
    }

    pub fn approve_claim(&self, id: &str) -> Result<Claim> {
        let mut claim = self.require_claim(id)?;
        claim.approve(self.clock.now())?;
        self.claims.save(&claim)?;

        log::info!("Claim {} approved", id);
        self.publish(&claim, ClaimEventKind::Approved);
        Ok(claim)
    }

    pub fn reject_claim(&self, id: &str) -> Result<Claim> {
        let mut claim = self.require_claim(id)?;
        claim.reject(self.clock.now())?;
        self.claims.save(&claim)?;

        log::info!("Claim {} rejected", id);
        self.publish(&claim, ClaimEventKind::Rejected);
        Ok(claim)
    }

    /// Approver edit of the assessment while the claim awaits a decision.
    pub fn revise_assessment(&self, id: &str, assessment: &str) -> Result<Claim> {
        let mut claim = self.require_claim(id)?;
        claim.ensure_under_review()?;
        if assessment.trim().is_empty() {
            return Err(ValidationError::BlankAssessment.into());
        }

        claim.assessment = assessment.to_string();
        self.claims.save(&claim)?;

        self.publish(&claim, ClaimEventKind::AssessmentUpdated);
        Ok(claim)
    }

    /// Quality review of the claim's current assessment. Not persisted.
    pub async fn generate_quality_review(&self, id: &str) -> Result<String> {
        let claim = self.require_claim(id)?;
        Ok(self.assessments.assess_quality(&claim.assessment).await?)
    }
}
