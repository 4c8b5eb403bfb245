//! Media evidence commands.

use std::path::PathBuf;

use claimdesk::media::payload_summary;
use claimdesk::{ClaimDesk, MediaFile, MediaUpload, UploadFailure, UploadReport};
use serde::Serialize;

use super::{ApiResponse, ClaimDetails};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachResult {
    pub claim_id: String,
    pub attached: Vec<MediaFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<UploadFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewItem {
    pub file: MediaFile,
    /// Full data URI with `--full`, otherwise a short description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub missing: bool,
}

/// Reads every path from disk and attaches what can be processed.
///
/// Unreadable paths are reported alongside processing failures; the rest of
/// the batch still goes through.
pub fn attach_media(desk: &ClaimDesk, id: &str, paths: &[PathBuf]) -> ApiResponse<AttachResult> {
    let mut uploads = Vec::new();
    let mut unreadable = Vec::new();

    for path in paths {
        match MediaUpload::from_path(path) {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                log::warn!("Skipping {:?}: {}", path, e);
                unreadable.push(UploadFailure {
                    name: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let result = desk.upload_media(id, uploads).map(|report: UploadReport| {
        let mut failed = unreadable;
        failed.extend(report.failed);
        AttachResult {
            claim_id: report.claim.id,
            attached: report.attached,
            failed,
        }
    });

    match result {
        Ok(result) if result.failed.is_empty() => ApiResponse::ok(result),
        Ok(result) => {
            let message = format!("{} file(s) could not be attached", result.failed.len());
            if result.attached.is_empty() {
                ApiResponse::failed_with(result, message)
            } else {
                // Partial success still counts.
                ApiResponse {
                    success: true,
                    data: Some(result),
                    error: Some(message),
                }
            }
        }
        Err(e) => ApiResponse::err(e.to_string()),
    }
}

pub fn detach_media(desk: &ClaimDesk, id: &str, file_id: &str) -> ApiResponse<ClaimDetails> {
    desk.remove_media(id, file_id).map(ClaimDetails::from).into()
}

pub fn preview_media(desk: &ClaimDesk, id: &str, full: bool) -> ApiResponse<Vec<PreviewItem>> {
    desk.media_previews(id)
        .map(|previews| {
            previews
                .into_iter()
                .map(|preview| PreviewItem {
                    missing: preview.payload.is_none(),
                    payload: preview.payload.map(|payload| {
                        if full {
                            payload
                        } else {
                            payload_summary(&payload)
                        }
                    }),
                    file: preview.file,
                })
                .collect()
        })
        .into()
}
