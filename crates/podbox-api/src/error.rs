//! # API Error Types
//!
//! [`AppError`] implements `axum::response::IntoResponse`. Every error is
//! rendered as an `ActionResult` failure envelope so clients decode one
//! shape whatever the status:
//!
//! | Variant            | Status | `error.name`        |
//! |--------------------|--------|---------------------|
//! | `Denied`           | 200    | the denial's name   |
//! | `BadRequest`       | 400    | `InvalidRequest`    |
//! | `Unauthorized`     | 401    | `Unauthorized`      |
//! | `FeedNotFound`     | 404    | `FeedNotFound`      |
//! | `PipelineNotFound` | 404    | `PipelineNotFound`  |
//! | `Internal`         | 500    | `ServerError`       |
//!
//! Internal error messages are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use podbox_core::{ActionResult, ErrorDetail, ErrorName};
use podbox_pcd::ProofConstructionError;
use thiserror::Error;

use crate::pipeline::CheckinDenial;
use crate::verifier::VerifyError;

/// Handler return type: a success envelope or an [`AppError`].
pub type ApiResult<T> = Result<Json<ActionResult<T>>, AppError>;

/// Wrap a value in a success envelope.
pub fn success<T>(value: T) -> ApiResult<T> {
    Ok(Json(ActionResult::Success(value)))
}

#[derive(Error, Debug)]
pub enum AppError {
    /// A well-formed request the domain refused.
    #[error("{0}")]
    Denied(ErrorDetail),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("feed not found: {0}")]
    FeedNotFound(String),

    #[error("pipeline not found: {0}")]
    PipelineNotFound(String),

    /// Message is logged but not returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_name(&self) -> (StatusCode, ErrorName) {
        match self {
            Self::Denied(detail) => (StatusCode::OK, detail.name.clone()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorName::InvalidRequest),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, ErrorName::Unauthorized),
            Self::FeedNotFound(_) => (StatusCode::NOT_FOUND, ErrorName::FeedNotFound),
            Self::PipelineNotFound(_) => (StatusCode::NOT_FOUND, ErrorName::PipelineNotFound),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorName::ServerError),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, name) = self.status_and_name();

        let detail = match self {
            Self::Denied(detail) => detail,
            Self::Internal(ref msg) => {
                tracing::error!(error = %msg, "internal server error");
                ErrorDetail::with_detail(name, "an internal error occurred")
            }
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::FeedNotFound(msg)
            | Self::PipelineNotFound(msg) => ErrorDetail::with_detail(name, msg),
        };

        (status, Json(ActionResult::<()>::Failure(detail))).into_response()
    }
}

impl From<VerifyError> for AppError {
    fn from(err: VerifyError) -> Self {
        Self::Denied(ErrorDetail::with_detail(err.error_name(), err.to_string()))
    }
}

impl From<CheckinDenial> for AppError {
    fn from(err: CheckinDenial) -> Self {
        Self::Denied(ErrorDetail::with_detail(err.error_name(), err.to_string()))
    }
}

impl From<ProofConstructionError> for AppError {
    fn from(err: ProofConstructionError) -> Self {
        Self::Internal(format!("ticket proof construction failed: {err}"))
    }
}
