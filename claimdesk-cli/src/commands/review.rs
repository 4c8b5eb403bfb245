//! Submission and approver decisions.

use claimdesk::ClaimDesk;

use super::{ApiResponse, ClaimDetails, ClaimListItem};

pub fn submit_claim(desk: &ClaimDesk, id: &str) -> ApiResponse<ClaimDetails> {
    desk.submit_claim(id).map(ClaimDetails::from).into()
}

pub fn pending_claims(desk: &ClaimDesk) -> ApiResponse<Vec<ClaimListItem>> {
    desk.pending_claims()
        .map(|claims| claims.iter().map(ClaimListItem::from).collect())
        .into()
}

pub fn approve_claim(desk: &ClaimDesk, id: &str) -> ApiResponse<ClaimDetails> {
    desk.approve_claim(id).map(ClaimDetails::from).into()
}

pub fn reject_claim(desk: &ClaimDesk, id: &str) -> ApiResponse<ClaimDetails> {
    desk.reject_claim(id).map(ClaimDetails::from).into()
}

pub fn revise_assessment(desk: &ClaimDesk, id: &str, text: &str) -> ApiResponse<ClaimDetails> {
    desk.revise_assessment(id, text).map(ClaimDetails::from).into()
}
