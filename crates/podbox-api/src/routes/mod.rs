//! # Generic Issuance Routes
//!
//! | Method | Path                                                | Module        |
//! |--------|-----------------------------------------------------|---------------|
//! | POST   | `/generic-issuance/api/feed/{pipelineId}/{feedId}`  | [`feeds`]     |
//! | POST   | `/generic-issuance/api/check-in`                    | [`checkin`]   |
//! | POST   | `/generic-issuance/api/pipeline-info`               | [`pipelines`] |

pub mod checkin;
pub mod feeds;
pub mod pipelines;

use crate::error::AppError;
use crate::state::AppState;
use crate::verifier::{CredentialVerifier, VerifyError};

/// The configured verifier, or a server fault when none is configured.
fn verifier(state: &AppState) -> Result<&CredentialVerifier, AppError> {
    state
        .verifier()
        .ok_or_else(|| AppError::Internal("no trusted email issuer configured".into()))
}

/// Log a rejected credential and convert it to a denial.
fn credential_rejected(err: VerifyError) -> AppError {
    tracing::warn!(error = %err, "credential rejected");
    err.into()
}
