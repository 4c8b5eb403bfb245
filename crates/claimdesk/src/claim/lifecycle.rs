//! Claim lifecycle state machine.
//!
//! The persisted state is the pair `(status, submitted)`:
//!
//! ```text
//!   create ──► New ──first edit──► In Progress
//!               │                      │
//!               └──────── submit ──────┘   (status unchanged, submitted = true)
//!                           │
//!                 ┌─────────┴─────────┐
//!              approve              reject
//!                 ▼                   ▼
//!             Completed           Rejected      (submitted = false, terminal)
//! ```
//!
//! Terminal claims accept no further transitions or edits. While a claim is
//! submitted only the approver side may touch it.

use chrono::{DateTime, Utc};

use super::{Claim, ClaimStatus, DisplayStatus};
use crate::error::{ClaimDeskError, LifecycleError, ValidationError};

/// Projects the persisted pair onto the status shown to users.
pub const fn display_status(status: ClaimStatus, submitted: bool) -> DisplayStatus {
    if submitted {
        return DisplayStatus::Pending;
    }
    match status {
        ClaimStatus::New => DisplayStatus::New,
        ClaimStatus::InProgress => DisplayStatus::InProgress,
        ClaimStatus::Completed => DisplayStatus::Completed,
        ClaimStatus::Rejected => DisplayStatus::Rejected,
    }
}

impl Claim {
    /// True while the claim waits for an approver decision.
    pub fn is_pending_review(&self) -> bool {
        self.submitted
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Fails unless the submitter may still change media, summary or
    /// assessment.
    pub fn ensure_editable(&self) -> Result<(), LifecycleError> {
        if self.is_terminal() {
            return Err(LifecycleError::Terminal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        if self.submitted {
            return Err(LifecycleError::AwaitingReview {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Fails unless the claim is awaiting approver action.
    ///
    /// A submitted claim is reviewable whatever its status; records written
    /// by older front ends carry `Completed` together with `submitted`.
    pub fn ensure_under_review(&self) -> Result<(), LifecycleError> {
        if self.submitted {
            return Ok(());
        }
        if self.is_terminal() {
            return Err(LifecycleError::Terminal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        Err(LifecycleError::NotSubmitted {
            id: self.id.clone(),
        })
    }

    /// Moves a `New` claim to `In Progress`. Any other status is left alone.
    pub fn mark_in_progress(&mut self) {
        if self.status == ClaimStatus::New {
            self.status = ClaimStatus::InProgress;
        }
    }

    /// Checks the submission preconditions without changing anything.
    ///
    /// Reports the first failing check in the order media, summary,
    /// assessment.
    pub fn check_submission(&self) -> Result<(), ClaimDeskError> {
        self.ensure_editable()?;

        if self.media_files.is_empty() {
            return Err(ValidationError::NoMediaFiles.into());
        }
        if self.summary.trim().is_empty() {
            return Err(ValidationError::BlankSummary.into());
        }
        if self.assessment.trim().is_empty() {
            return Err(ValidationError::BlankAssessment.into());
        }
        Ok(())
    }

    /// Sends the claim to the approver. The status is kept as-is.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<(), ClaimDeskError> {
        self.check_submission()?;
        self.submitted = true;
        self.submitted_at = Some(now);
        Ok(())
    }

    /// Resolves a submitted claim as `Completed`.
    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.ensure_under_review()?;
        self.status = ClaimStatus::Completed;
        self.submitted = false;
        self.approved_at = Some(now);
        Ok(())
    }

    /// Resolves a submitted claim as `Rejected`.
    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.ensure_under_review()?;
        self.status = ClaimStatus::Rejected;
        self.submitted = false;
        self.rejected_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{MediaFile, MediaKind};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn ready_claim() -> Claim {
        let mut claim = Claim::new("CLM-1", "Jane Doe", "fender bender", t0()).unwrap();
        claim.media_files.push(MediaFile {
            id: "f1".to_string(),
            name: "bumper.jpg".to_string(),
            kind: MediaKind::Image,
            size: 2048,
            last_modified: 0,
        });
        claim.summary = "Front bumper dented".to_string();
        claim.assessment = "Final Assessment: moderate".to_string();
        claim
    }

    #[test]
    fn test_display_status_projection() {
        assert_eq!(display_status(ClaimStatus::New, false), DisplayStatus::New);
        assert_eq!(
            display_status(ClaimStatus::InProgress, false),
            DisplayStatus::InProgress
        );
        assert_eq!(display_status(ClaimStatus::New, true), DisplayStatus::Pending);
        assert_eq!(
            display_status(ClaimStatus::InProgress, true),
            DisplayStatus::Pending
        );
        assert_eq!(
            display_status(ClaimStatus::Completed, false),
            DisplayStatus::Completed
        );
        assert_eq!(
            display_status(ClaimStatus::Rejected, false),
            DisplayStatus::Rejected
        );
    }

    #[test]
    fn test_submit_keeps_status_and_sets_timestamp() {
        let mut claim = ready_claim();
        claim.mark_in_progress();
        let at = t0() + Duration::hours(1);

        claim.submit(at).unwrap();

        assert!(claim.submitted);
        assert_eq!(claim.status, ClaimStatus::InProgress);
        assert_eq!(claim.submitted_at, Some(at));
        assert_eq!(claim.display_status(), DisplayStatus::Pending);
    }

    #[test]
    fn test_submit_requires_media() {
        let mut claim = ready_claim();
        claim.media_files.clear();
        let before = claim.clone();

        let err = claim.submit(t0()).unwrap_err();
        assert!(matches!(
            err,
            ClaimDeskError::Validation(ValidationError::NoMediaFiles)
        ));
        assert_eq!(claim, before);
    }

    #[test]
    fn test_submit_requires_summary() {
        let mut claim = ready_claim();
        claim.summary = "  \n ".to_string();

        let err = claim.submit(t0()).unwrap_err();
        assert!(matches!(
            err,
            ClaimDeskError::Validation(ValidationError::BlankSummary)
        ));
        assert!(!claim.submitted);
    }

    #[test]
    fn test_submit_requires_assessment() {
        let mut claim = ready_claim();
        claim.assessment = String::new();

        let err = claim.submit(t0()).unwrap_err();
        assert!(matches!(
            err,
            ClaimDeskError::Validation(ValidationError::BlankAssessment)
        ));
        assert!(claim.submitted_at.is_none());
    }

    #[test]
    fn test_submit_twice_is_refused() {
        let mut claim = ready_claim();
        claim.submit(t0()).unwrap();
        let err = claim.submit(t0() + Duration::minutes(5)).unwrap_err();
        assert!(matches!(
            err,
            ClaimDeskError::Lifecycle(LifecycleError::AwaitingReview { .. })
        ));
        assert_eq!(claim.submitted_at, Some(t0()));
    }

    #[test]
    fn test_approve_submitted_claim() {
        let mut claim = ready_claim();
        claim.submit(t0()).unwrap();
        let at = t0() + Duration::days(1);

        claim.approve(at).unwrap();

        assert_eq!(claim.status, ClaimStatus::Completed);
        assert!(!claim.submitted);
        assert_eq!(claim.approved_at, Some(at));
        assert!(claim.rejected_at.is_none());
        assert_eq!(claim.submitted_at, Some(t0()));
    }

    #[test]
    fn test_reject_submitted_claim() {
        let mut claim = ready_claim();
        claim.submit(t0()).unwrap();
        let at = t0() + Duration::days(2);

        claim.reject(at).unwrap();

        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert!(!claim.submitted);
        assert_eq!(claim.rejected_at, Some(at));
        assert!(claim.approved_at.is_none());
    }

    #[test]
    fn test_approve_requires_submission() {
        let mut claim = ready_claim();
        let err = claim.approve(t0()).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::NotSubmitted {
                id: "CLM-1".to_string()
            }
        );
        assert_eq!(claim.status, ClaimStatus::New);
        assert!(claim.approved_at.is_none());
    }

    #[test]
    fn test_terminal_claims_are_frozen() {
        let mut claim = ready_claim();
        claim.submit(t0()).unwrap();
        claim.approve(t0()).unwrap();

        assert!(matches!(
            claim.ensure_editable(),
            Err(LifecycleError::Terminal {
                status: ClaimStatus::Completed,
                ..
            })
        ));
        assert!(matches!(
            claim.submit(t0()),
            Err(ClaimDeskError::Lifecycle(LifecycleError::Terminal { .. }))
        ));
        assert!(matches!(
            claim.reject(t0()),
            Err(LifecycleError::Terminal { .. })
        ));
        assert!(claim.rejected_at.is_none());
    }

    #[test]
    fn test_submitted_completed_record_can_be_resolved() {
        let mut claim = ready_claim();
        claim.status = ClaimStatus::Completed;
        claim.submitted = true;
        assert_eq!(claim.display_status(), DisplayStatus::Pending);

        let mut rejected = claim.clone();
        claim.approve(t0()).unwrap();
        assert_eq!(claim.status, ClaimStatus::Completed);
        assert!(!claim.submitted);
        assert_eq!(claim.approved_at, Some(t0()));

        rejected.reject(t0()).unwrap();
        assert_eq!(rejected.status, ClaimStatus::Rejected);
        assert!(!rejected.submitted);
        assert!(matches!(
            rejected.approve(t0()),
            Err(LifecycleError::Terminal { .. })
        ));
    }

    #[test]
    fn test_mark_in_progress_only_from_new() {
        let mut claim = ready_claim();
        claim.mark_in_progress();
        assert_eq!(claim.status, ClaimStatus::InProgress);

        claim.status = ClaimStatus::Rejected;
        claim.mark_in_progress();
        assert_eq!(claim.status, ClaimStatus::Rejected);
    }
}
