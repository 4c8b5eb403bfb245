use thiserror::Error;

use crate::error::ValidationError;

#[derive(Debug, Error)]
pub enum AssessmentError {
    /// The request was rejected before reaching any provider.
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("API key is not configured. Please check your environment variables.")]
    MissingCredential,

    #[error("Authentication failed. Please check your API key.")]
    AuthenticationFailed,

    #[error("Access forbidden. Please check your API key and model access.")]
    AccessForbidden,

    #[error("Model is loading, try again shortly")]
    ModelLoading,

    #[error("API request failed with status {status}. Details: {body}")]
    Http { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Invalid response format from API: {0}")]
    MalformedResponse(String),

    #[error("Failed to generate response after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<AssessmentError>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AssessmentError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ModelLoading
                | Self::Http { .. }
                | Self::Timeout(_)
                | Self::Transport(_)
                | Self::MalformedResponse(_)
        )
    }
}
