//! Advisory assessment text for claims.
//!
//! [`AssessmentGenerator`] validates inputs and delegates to an
//! [`AssessmentProvider`]: the canned [`MockAssessmentProvider`] by default,
//! or [`RemoteAssessmentProvider`] for a hosted text-generation model.

pub mod error;
pub mod mock;
pub mod prompt;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::claim::MediaFile;
use crate::config::{AssessmentConfig, ProviderKind};
use crate::error::ValidationError;

pub use error::AssessmentError;
pub use mock::{FailingAssessmentProvider, MockAssessmentProvider};
pub use prompt::{AssessmentKind, AssessmentRequest};
pub use remote::{GenerationTransport, RemoteAssessmentProvider, RetryPolicy};

/// Produces assessment text for a validated request.
#[async_trait]
pub trait AssessmentProvider: Send + Sync + std::fmt::Debug {
    async fn generate(&self, request: &AssessmentRequest) -> Result<String, AssessmentError>;
}

/// Result object form: `error` is set whenever generation failed, and `text`
/// then holds a fallback notice instead of an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssessmentResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Folds a generation result into the response form, logging failures.
    pub fn from_result(kind: AssessmentKind, result: Result<String, AssessmentError>) -> Self {
        match result {
            Ok(text) => Self { text, error: None },
            Err(err) => {
                log::error!("Error generating {} assessment: {}", kind, err);
                Self {
                    text: kind.fallback_text().to_string(),
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssessmentGenerator {
    provider: Arc<dyn AssessmentProvider>,
}

impl Default for AssessmentGenerator {
    fn default() -> Self {
        Self::new(Arc::new(MockAssessmentProvider::new()))
    }
}

impl AssessmentGenerator {
    pub fn new(provider: Arc<dyn AssessmentProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &AssessmentConfig) -> Result<Self, AssessmentError> {
        let provider: Arc<dyn AssessmentProvider> = match config.provider {
            ProviderKind::Mock => Arc::new(MockAssessmentProvider::new()),
            ProviderKind::Remote => {
                log::info!("Using remote assessment provider at {}", config.endpoint);
                Arc::new(RemoteAssessmentProvider::from_config(config)?)
            }
        };
        Ok(Self::new(provider))
    }

    pub async fn assess_media(&self, media_files: &[MediaFile]) -> Result<String, AssessmentError> {
        if media_files.is_empty() {
            return Err(ValidationError::NoMediaFiles.into());
        }
        self.provider
            .generate(&AssessmentRequest::Media {
                media_files: media_files.to_vec(),
            })
            .await
    }

    pub async fn assess_summary(&self, summary: &str) -> Result<String, AssessmentError> {
        if summary.trim().is_empty() {
            return Err(ValidationError::BlankSummary.into());
        }
        self.provider
            .generate(&AssessmentRequest::Summary {
                summary: summary.to_string(),
            })
            .await
    }

    pub async fn assess_final(
        &self,
        media_files: &[MediaFile],
        summary: &str,
    ) -> Result<String, AssessmentError> {
        if media_files.is_empty() || summary.trim().is_empty() {
            return Err(ValidationError::MissingFinalInputs.into());
        }
        self.provider
            .generate(&AssessmentRequest::Final {
                media_files: media_files.to_vec(),
                summary: summary.to_string(),
            })
            .await
    }

    /// Approver-side review of an assessment. Never persisted.
    pub async fn assess_quality(&self, assessment: &str) -> Result<String, AssessmentError> {
        if assessment.trim().is_empty() {
            return Err(ValidationError::BlankAssessment.into());
        }
        self.provider
            .generate(&AssessmentRequest::Quality {
                assessment: assessment.to_string(),
            })
            .await
    }
}
