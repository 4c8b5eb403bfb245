//! Summary and assessment commands.

use claimdesk::{AssessmentKind, AssessmentResponse, ClaimDesk, ClaimDeskError};
use clap::ValueEnum;
use serde::Serialize;

use super::{ApiResponse, ClaimDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssessTarget {
    /// Advisory notes about the attached media.
    Media,
    /// Advisory notes about the damage summary.
    Summary,
    /// Full report, stored as the claim's assessment.
    Final,
    /// Approver review of the current assessment.
    Quality,
}

impl AssessTarget {
    fn kind(self) -> AssessmentKind {
        match self {
            AssessTarget::Media => AssessmentKind::Media,
            AssessTarget::Summary => AssessmentKind::Summary,
            AssessTarget::Final => AssessmentKind::Final,
            AssessTarget::Quality => AssessmentKind::Quality,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedText {
    pub claim_id: String,
    pub kind: String,
    pub text: String,
    /// True when `text` was stored on the claim.
    pub stored: bool,
}

pub fn update_summary(desk: &ClaimDesk, id: &str, text: &str) -> ApiResponse<ClaimDetails> {
    desk.update_summary(id, text).map(ClaimDetails::from).into()
}

pub fn update_assessment(desk: &ClaimDesk, id: &str, text: &str) -> ApiResponse<ClaimDetails> {
    desk.update_assessment(id, text).map(ClaimDetails::from).into()
}

/// Runs a generator. Provider failures still print the fallback notice.
pub async fn generate(desk: &ClaimDesk, id: &str, target: AssessTarget) -> ApiResponse<GeneratedText> {
    let kind = target.kind();
    let result = match target {
        AssessTarget::Media => desk.generate_media_assessment(id).await,
        AssessTarget::Summary => desk.generate_summary_assessment(id).await,
        AssessTarget::Final => desk
            .generate_final_assessment(id)
            .await
            .map(|claim| claim.assessment),
        AssessTarget::Quality => desk.generate_quality_review(id).await,
    };

    let generated = |text: String, stored: bool| GeneratedText {
        claim_id: id.to_string(),
        kind: kind.as_str().to_string(),
        text,
        stored,
    };

    let outcome = match result {
        Ok(text) => Ok(text),
        Err(ClaimDeskError::Assessment(e)) => Err(e),
        Err(e) => return ApiResponse::err(e.to_string()),
    };
    let stored = outcome.is_ok() && target == AssessTarget::Final;

    let response = AssessmentResponse::from_result(kind, outcome);
    match response.error {
        None => ApiResponse::ok(generated(response.text, stored)),
        Some(error) => ApiResponse::failed_with(generated(response.text, false), error),
    }
}
