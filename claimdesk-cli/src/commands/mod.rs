//! Command handlers for the claimdesk CLI.
//!
//! Commands are organized by role:
//! - `claims`: creating, listing and deleting claims
//! - `media`: attaching, detaching and previewing evidence
//! - `assessment`: summary, assessment text and generated assessments
//! - `review`: approver queue and decisions

pub mod assessment;
pub mod claims;
pub mod media;
pub mod review;

pub use assessment::*;
pub use claims::*;
pub use media::*;
pub use review::*;

use std::process::ExitCode;

use serde::Serialize;

/// Envelope printed for every command.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// A failure that still carries something to show, such as fallback text.
    pub fn failed_with(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

impl<T> From<claimdesk::Result<T>> for ApiResponse<T> {
    fn from(result: claimdesk::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                log::debug!("Command failed: {:?}", e);
                Self::err(e.to_string())
            }
        }
    }
}

/// Prints the response as JSON on stdout.
pub fn respond<T: Serialize>(response: ApiResponse<T>) -> ExitCode {
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to encode response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
