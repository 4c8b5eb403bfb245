//! Claim creation, lookup and deletion.

use claimdesk::{Claim, ClaimDesk, DisplayStatus};
use serde::Serialize;

use super::ApiResponse;

/// One line of the claim list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimListItem {
    pub id: String,
    pub customer_name: String,
    pub status: DisplayStatus,
    pub media_count: usize,
    pub date: String,
}

impl From<&Claim> for ClaimListItem {
    fn from(claim: &Claim) -> Self {
        Self {
            id: claim.id.clone(),
            customer_name: claim.customer_name.clone(),
            status: claim.display_status(),
            media_count: claim.media_files.len(),
            date: claim.date.to_rfc3339(),
        }
    }
}

/// Full claim plus its derived display status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDetails {
    pub display_status: DisplayStatus,
    #[serde(flatten)]
    pub claim: Claim,
}

impl From<Claim> for ClaimDetails {
    fn from(claim: Claim) -> Self {
        Self {
            display_status: claim.display_status(),
            claim,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub id: String,
    pub deleted: bool,
}

pub fn create_claim(desk: &ClaimDesk, customer_name: &str, description: &str) -> ApiResponse<ClaimDetails> {
    desk.create_claim(customer_name, description)
        .map(ClaimDetails::from)
        .into()
}

pub fn list_claims(desk: &ClaimDesk) -> ApiResponse<Vec<ClaimListItem>> {
    desk.list_claims()
        .map(|claims| claims.iter().map(ClaimListItem::from).collect())
        .into()
}

pub fn show_claim(desk: &ClaimDesk, id: &str) -> ApiResponse<ClaimDetails> {
    desk.require_claim(id).map(ClaimDetails::from).into()
}

pub fn delete_claim(desk: &ClaimDesk, id: &str) -> ApiResponse<DeleteResult> {
    desk.delete_claim(id)
        .map(|deleted| DeleteResult {
            id: id.to_string(),
            deleted,
        })
        .into()
}
