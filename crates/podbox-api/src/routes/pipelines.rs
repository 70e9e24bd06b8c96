//! # Pipeline Info Route
//!
//! Administrative summary of a pipeline. Mounted behind the bearer-token
//! middleware in [`crate::app`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use podbox_interface::{PipelineInfo, PipelineInfoRequest, PIPELINE_INFO_PATH};

use crate::error::{success, ApiResult, AppError};
use crate::extractors::extract_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(PIPELINE_INFO_PATH, post(pipeline_info))
}

/// POST /generic-issuance/api/pipeline-info
#[utoipa::path(
    post,
    path = "/generic-issuance/api/pipeline-info",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Pipeline summary", body = crate::openapi::ActionResultEnvelope),
        (status = 401, description = "Missing or invalid admin token", body = crate::openapi::ActionResultEnvelope),
        (status = 404, description = "Unknown pipeline", body = crate::openapi::ActionResultEnvelope),
    ),
    security(("bearer_auth" = [])),
    tag = "pipelines"
)]
pub async fn pipeline_info(
    State(state): State<AppState>,
    body: Result<Json<PipelineInfoRequest>, JsonRejection>,
) -> ApiResult<PipelineInfo> {
    let req = extract_json(body)?;
    let pipeline = state
        .pipeline(&req.pipeline_id)
        .ok_or_else(|| AppError::PipelineNotFound(req.pipeline_id.to_string()))?;
    success(pipeline.info(&state.config.public_url))
}
