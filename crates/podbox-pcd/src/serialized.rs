//! # Serialized Proof Envelope
//!
//! `{"type": "email-pcd", "pcd": "{...}"}`. The `pcd` field is a JSON string
//! rather than a nested object, so the envelope can carry any proof body
//! without the outer decoder knowing its shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PcdVerificationError, ProofConstructionError};

/// Proof type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcdType {
    /// Email attestation.
    #[serde(rename = "email-pcd")]
    Email,
    /// Pipeline-signed ticket.
    #[serde(rename = "eddsa-ticket-pcd")]
    EddsaTicket,
    /// Identity signature over a credential payload.
    #[serde(rename = "semaphore-signature-pcd")]
    SemaphoreSignature,
}

impl PcdType {
    /// The wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email-pcd",
            Self::EddsaTicket => "eddsa-ticket-pcd",
            Self::SemaphoreSignature => "semaphore-signature-pcd",
        }
    }
}

impl std::fmt::Display for PcdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proof in transit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPcd {
    /// Proof type tag.
    #[serde(rename = "type")]
    pub pcd_type: PcdType,
    /// JSON-encoded proof body.
    pub pcd: String,
}

/// A proof kind that can be wrapped in and unwrapped from a [`SerializedPcd`].
///
/// Implementors provide the wire body type; the envelope handling is shared.
pub trait Pcd: Sized {
    /// Envelope tag for this proof kind.
    const TYPE: PcdType;

    /// Serializable body placed in the envelope's `pcd` string.
    type Body: Serialize + DeserializeOwned;

    /// Borrow or build the wire body.
    fn to_body(&self) -> Self::Body;

    /// Rebuild from a decoded wire body.
    fn from_body(body: Self::Body) -> Result<Self, PcdVerificationError>;

    /// Wrap into an envelope.
    fn serialize_pcd(&self) -> Result<SerializedPcd, ProofConstructionError> {
        Ok(SerializedPcd {
            pcd_type: Self::TYPE,
            pcd: serde_json::to_string(&self.to_body())?,
        })
    }

    /// Unwrap from an envelope, checking the type tag. Does not verify
    /// signatures.
    fn deserialize_pcd(serialized: &SerializedPcd) -> Result<Self, PcdVerificationError> {
        if serialized.pcd_type != Self::TYPE {
            return Err(PcdVerificationError::WrongType {
                expected: Self::TYPE,
                found: serialized.pcd_type,
            });
        }
        let body: Self::Body = serde_json::from_str(&serialized.pcd)?;
        Self::from_body(body)
    }
}
