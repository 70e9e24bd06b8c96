//! Error types for proof construction, argument parsing and verification.

use podbox_core::error::{CanonicalizationError, CryptoError};
use thiserror::Error;

use crate::serialized::PcdType;

/// Proof construction failed. Always propagated to the caller.
#[derive(Error, Debug)]
pub enum ProofConstructionError {
    /// Key material was malformed.
    #[error("invalid key material: {0}")]
    Key(#[from] CryptoError),

    /// The value to sign could not be canonicalized (e.g. it contains a float).
    #[error("payload cannot be canonicalized: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A proof argument was missing, unknown or malformed.
    #[error("invalid proof argument: {0}")]
    Argument(#[from] ArgumentError),

    /// The proof body could not be encoded.
    #[error("proof serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A loosely-typed proof argument bag did not match the closed field set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The argument bag was not a JSON object.
    #[error("proof arguments must be a JSON object")]
    NotAnObject,

    /// A required field was absent.
    #[error("missing argument {0:?}")]
    Missing(&'static str),

    /// A field outside the closed set was supplied.
    #[error("unknown argument {0:?}")]
    Unknown(String),

    /// A field had the wrong argument type or shape.
    #[error("argument {name:?}: {reason}")]
    Malformed {
        /// Field name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// A received proof did not verify or could not be decoded.
#[derive(Error, Debug)]
pub enum PcdVerificationError {
    /// The envelope names a different proof type.
    #[error("expected {expected} proof, found {found}")]
    WrongType {
        /// Type the caller asked for.
        expected: PcdType,
        /// Type the envelope carries.
        found: PcdType,
    },

    /// The proof body could not be decoded.
    #[error("malformed proof: {0}")]
    Malformed(String),

    /// The signed message was not in canonical form.
    #[error("signed message is not canonical: {0}")]
    NotCanonical(#[from] CanonicalizationError),

    /// The signature did not verify, or key material was invalid.
    #[error("signature check failed: {0}")]
    Signature(#[from] CryptoError),

    /// The proof was signed by a key other than the expected issuer.
    #[error("proof signed by untrusted key {0}")]
    UntrustedSigner(String),
}

impl From<serde_json::Error> for PcdVerificationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
