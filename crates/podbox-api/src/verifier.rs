//! # Credential Verifier
//!
//! Turns a [`SignedCredential`] into a [`Claimant`] in two steps:
//!
//! 1. [`CredentialVerifier::open`]: the signature verifies over the exact
//!    signed message, the payload decodes from those bytes, and its action
//!    matches the endpoint.
//! 2. [`CredentialVerifier::authenticate`]: the payload is fresh, the
//!    embedded email proof was issued by the trusted issuer, and it is bound
//!    to the commitment of the key that signed the credential.
//!
//! Handlers that need the payload before authenticating (to attribute a
//! failure to a pipeline) call the steps separately.

use chrono::Duration;
use podbox_core::{EmailAddress, ErrorName, Timestamp};
use podbox_crypto::{Ed25519PublicKey, IdentityCommitment};
use podbox_interface::{CredentialAction, CredentialPayload, PipelineUser};
use podbox_pcd::{EmailPcd, Pcd, PcdVerificationError, SignedCredential};
use thiserror::Error;

use crate::state::UserDirectory;

/// How far a credential timestamp may run ahead of the server clock.
const MAX_FUTURE_SKEW_SECS: i64 = 60;

/// Largest max age `chrono::Duration::seconds` accepts.
const MAX_AGE_CAP_SECS: u64 = (i64::MAX / 1000) as u64;

/// Why a credential was not accepted.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("credential signature rejected: {0}")]
    Signature(#[from] PcdVerificationError),

    #[error("credential authorizes {found}, endpoint requires {expected}")]
    ActionMismatch {
        expected: CredentialAction,
        found: CredentialAction,
    },

    #[error("credential is {age_secs}s old, limit is {max_age_secs}s")]
    Expired { age_secs: i64, max_age_secs: i64 },

    #[error("credential is dated {ahead_secs}s in the future")]
    FromFuture { ahead_secs: i64 },

    #[error("email proof rejected: {0}")]
    EmailProof(PcdVerificationError),

    #[error("email proof is bound to a different identity")]
    CommitmentMismatch,

    #[error("no user registered for {0}")]
    UnknownIdentity(EmailAddress),
}

impl VerifyError {
    /// Wire name of this failure.
    pub fn error_name(&self) -> ErrorName {
        match self {
            Self::UnknownIdentity(_) => ErrorName::UnknownIdentity,
            _ => ErrorName::InvalidCredential,
        }
    }
}

/// A credential whose signature and action have been checked.
#[derive(Debug, Clone)]
pub struct OpenedCredential {
    pub payload: CredentialPayload,
    pub commitment: IdentityCommitment,
}

/// An authenticated credential holder.
#[derive(Debug, Clone)]
pub struct Claimant {
    pub email: EmailAddress,
    pub commitment: IdentityCommitment,
    pub payload: CredentialPayload,
}

impl Claimant {
    /// Look the claimant up in `users`.
    pub fn resolve<'a>(&self, users: &'a UserDirectory) -> Result<&'a PipelineUser, VerifyError> {
        users
            .resolve(&self.email)
            .ok_or_else(|| VerifyError::UnknownIdentity(self.email.clone()))
    }
}

/// Verifies credentials against a trusted email issuer.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    issuer: Ed25519PublicKey,
    max_age: Duration,
}

impl CredentialVerifier {
    pub fn new(issuer: Ed25519PublicKey, max_age_secs: u64) -> Self {
        Self {
            issuer,
            max_age: Duration::seconds(max_age_secs.min(MAX_AGE_CAP_SECS) as i64),
        }
    }

    /// Check the signature and that the payload authorizes `expected`.
    pub fn open(
        &self,
        credential: &SignedCredential,
        expected: CredentialAction,
    ) -> Result<OpenedCredential, VerifyError> {
        let verified = credential.verify::<CredentialPayload>()?;
        let commitment = verified.commitment();
        let payload = verified.into_payload();
        if payload.action() != expected {
            return Err(VerifyError::ActionMismatch {
                expected,
                found: payload.action(),
            });
        }
        Ok(OpenedCredential {
            payload,
            commitment,
        })
    }

    /// Check freshness and the embedded email proof.
    pub fn authenticate(
        &self,
        opened: OpenedCredential,
        now: Timestamp,
    ) -> Result<Claimant, VerifyError> {
        let age = opened.payload.timestamp().age_at(now);
        if age > self.max_age {
            return Err(VerifyError::Expired {
                age_secs: age.num_seconds(),
                max_age_secs: self.max_age.num_seconds(),
            });
        }
        if age < -Duration::seconds(MAX_FUTURE_SKEW_SECS) {
            return Err(VerifyError::FromFuture {
                ahead_secs: -age.num_seconds(),
            });
        }

        let email_pcd =
            EmailPcd::deserialize_pcd(opened.payload.email_proof()).map_err(VerifyError::EmailProof)?;
        email_pcd
            .verify_issued_by(&self.issuer)
            .map_err(VerifyError::EmailProof)?;
        if email_pcd.claim.semaphore_id != opened.commitment {
            return Err(VerifyError::CommitmentMismatch);
        }

        Ok(Claimant {
            email: email_pcd.claim.email_address,
            commitment: opened.commitment,
            payload: opened.payload,
        })
    }

    /// [`open`](Self::open) then [`authenticate`](Self::authenticate).
    pub fn verify(
        &self,
        credential: &SignedCredential,
        expected: CredentialAction,
        now: Timestamp,
    ) -> Result<Claimant, VerifyError> {
        let opened = self.open(credential, expected)?;
        self.authenticate(opened, now)
    }
}
