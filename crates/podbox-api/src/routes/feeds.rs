//! # Feed Poll Route
//!
//! The poller proves who they are with a signed `poll` credential and gets
//! back the folder actions for their tickets.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use podbox_core::{PipelineId, Timestamp};
use podbox_interface::{CredentialAction, PollFeedRequest, PollFeedResponse};

use super::{credential_rejected, verifier};
use crate::error::{success, ApiResult, AppError};
use crate::extractors::extract_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/generic-issuance/api/feed/{pipeline_id}/{feed_id}",
        post(poll_feed),
    )
}

/// POST /generic-issuance/api/feed/{pipeline_id}/{feed_id}
#[utoipa::path(
    post,
    path = "/generic-issuance/api/feed/{pipeline_id}/{feed_id}",
    params(
        ("pipeline_id" = String, Path, description = "Pipeline UUID"),
        ("feed_id" = String, Path, description = "Feed id within the pipeline"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Folder actions, or a denial", body = crate::openapi::ActionResultEnvelope),
        (status = 400, description = "Malformed request", body = crate::openapi::ActionResultEnvelope),
        (status = 404, description = "Unknown pipeline or feed", body = crate::openapi::ActionResultEnvelope),
    ),
    tag = "feeds"
)]
pub async fn poll_feed(
    State(state): State<AppState>,
    Path((pipeline_id, feed_id)): Path<(String, String)>,
    body: Result<Json<PollFeedRequest>, JsonRejection>,
) -> ApiResult<PollFeedResponse> {
    let pipeline = pipeline_id
        .parse::<PipelineId>()
        .ok()
        .and_then(|id| state.pipeline(&id))
        .filter(|p| p.feed().id.as_str() == feed_id)
        .ok_or_else(|| AppError::FeedNotFound(format!("{pipeline_id}/{feed_id}")))?;

    let req = extract_json(body)?;
    if req.feed_id.as_str() != feed_id {
        return Err(AppError::BadRequest(format!(
            "body feedId {} does not match path feed {feed_id}",
            req.feed_id
        )));
    }

    let now = Timestamp::now();
    let claimant = verifier(&state)?
        .verify(&req.pcd, CredentialAction::Poll, now)
        .map_err(credential_rejected)?;
    let holder = claimant.resolve(state.users()).map_err(credential_rejected)?;

    let actions = pipeline.feed_actions(holder, claimant.commitment, now)?;
    success(PollFeedResponse { actions })
}
