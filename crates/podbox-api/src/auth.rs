//! # Admin Bearer Authentication
//!
//! Pipeline info is an administrative endpoint gated by a static bearer
//! token (`PODBOX_ADMIN_TOKEN`). Feed and check-in endpoints are not behind
//! this middleware; they authenticate through the signed credential in the
//! request body.
//!
//! When no token is configured every request is refused with `401`.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison of bearer tokens.
///
/// When lengths differ, a dummy comparison keeps the timing independent of
/// where the mismatch is.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Require `Authorization: Bearer <token>` matching [`AuthConfig::token`].
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let Some(expected) = expected else {
        tracing::warn!("authentication failed: no admin token configured");
        return AppError::Unauthorized("no admin token configured".into()).into_response();
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) if value.starts_with("Bearer ") => {
            if constant_time_token_eq(&value[7..], &expected) {
                next.run(request).await
            } else {
                tracing::warn!("authentication failed: invalid bearer token");
                AppError::Unauthorized("invalid bearer token".into()).into_response()
            }
        }
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            AppError::Unauthorized("authorization header must use Bearer scheme".into())
                .into_response()
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            AppError::Unauthorized("missing authorization header".into()).into_response()
        }
    }
}
