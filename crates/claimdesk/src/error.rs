use std::path::PathBuf;
use thiserror::Error;

use crate::assessment::AssessmentError;
use crate::claim::ClaimStatus;

#[derive(Error, Debug)]
pub enum ClaimDeskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Assessment error: {0}")]
    Assessment(#[source] AssessmentError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Media file '{file_id}' is not attached to claim '{claim_id}'")]
    MediaNotFound { claim_id: String, file_id: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Failed to resolve assessment API key: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

/// User input that is missing or invalid. Always recovered locally; the
/// claim is never mutated when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    BlankField { field: &'static str },

    #[error("Please upload at least one media file")]
    NoMediaFiles,

    #[error("Please provide a damage summary")]
    BlankSummary,

    #[error("Please generate or provide an assessment")]
    BlankAssessment,

    #[error("Both media files and summary are required")]
    MissingFinalInputs,

    #[error("Media file id '{id}' is already attached")]
    DuplicateMediaId { id: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Claim '{id}' is {status} and can no longer change")]
    Terminal { id: String, status: ClaimStatus },

    #[error("Claim '{id}' is awaiting approver review")]
    AwaitingReview { id: String },

    #[error("Claim '{id}' has not been submitted for review")]
    NotSubmitted { id: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode or decode stored claims: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("No data directory configured and no home directory available")]
    NoDataDirectory,

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to read media file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image '{name}': {reason}")]
    DecodeImage { name: String, reason: String },

    #[error("Failed to encode image '{name}': {reason}")]
    EncodeImage { name: String, reason: String },

    #[error("Upload '{0}' is empty")]
    EmptyUpload(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
}

impl From<AssessmentError> for ClaimDeskError {
    fn from(err: AssessmentError) -> Self {
        match err {
            AssessmentError::Invalid(e) => ClaimDeskError::Validation(e),
            other => ClaimDeskError::Assessment(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClaimDeskError>;
