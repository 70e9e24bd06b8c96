//! # Error Types
//!
//! Low-level error enums shared across the workspace. Crates higher in the
//! graph wrap these in their own `thiserror` enums; none of them ever cross
//! the client request boundary as a panic.

use thiserror::Error;

/// Top-level error type for foundational operations.
#[derive(Error, Debug)]
pub enum PodboxError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// An identifier or value failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// A string presented as canonical JSON re-canonicalized to different bytes.
    #[error("input is not in canonical JSON form")]
    NotCanonical,

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// The value to be signed or committed could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Identifier or value validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email address is not of the form `local@domain`.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// Feed identifiers are path segments and must be non-empty `[A-Za-z0-9_-]`.
    #[error("invalid feed id: {0:?}")]
    InvalidFeedId(String),

    /// Timestamp is malformed or not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
