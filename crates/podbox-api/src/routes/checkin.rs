//! # Check-In Route
//!
//! The credential is the whole request: its payload names the ticket, its
//! embedded email proof names the checker.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use podbox_core::Timestamp;
use podbox_interface::{CheckInRequest, CredentialAction, CHECK_IN_PATH};

use super::{credential_rejected, verifier};
use crate::error::{success, ApiResult, AppError};
use crate::extractors::extract_json;
use crate::pipeline::CheckinDenial;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(CHECK_IN_PATH, post(check_in))
}

/// POST /generic-issuance/api/check-in
#[utoipa::path(
    post,
    path = "/generic-issuance/api/check-in",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Checked in, or a denial", body = crate::openapi::ActionResultEnvelope),
        (status = 400, description = "Malformed request", body = crate::openapi::ActionResultEnvelope),
    ),
    tag = "check-in"
)]
pub async fn check_in(
    State(state): State<AppState>,
    body: Result<Json<CheckInRequest>, JsonRejection>,
) -> ApiResult<()> {
    let req = extract_json(body)?;
    let verifier = verifier(&state)?;
    let now = Timestamp::now();

    let opened = verifier
        .open(&req.credential, CredentialAction::CheckIn)
        .map_err(credential_rejected)?;
    let target = *opened
        .payload
        .context()
        .ok_or_else(|| AppError::BadRequest("checkin payload has no ticket context".into()))?;

    let claimant = verifier
        .authenticate(opened, now)
        .map_err(credential_rejected)?;

    // Only authenticated attempts count against the ticket's pipeline.
    let pipeline = state.pipeline_for_ticket(&target.ticket_id);
    let checker = claimant.resolve(state.users()).map_err(|e| {
        if let Some(p) = &pipeline {
            p.outcomes().record_denial(e.error_name());
        }
        credential_rejected(e)
    })?;

    let Some(pipeline) = pipeline else {
        tracing::info!(ticket = %target.ticket_id, "check-in denied: ticket not found");
        return Err(CheckinDenial::TicketNotFound(target.ticket_id).into());
    };

    pipeline.check_in(checker, &target, now)?;
    success(())
}
