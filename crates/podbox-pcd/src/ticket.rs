//! # Ticket Proof
//!
//! A pipeline signs the canonical bytes of a [`TicketData`] with its own key
//! and hands the result to the attendee through a feed. Holders present these
//! to check-in UIs; the server never needs them back, since check-in
//! resolves tickets by `(eventId, ticketId)` from the credential payload.

use podbox_core::{CanonicalBytes, EmailAddress, EventId, ProductId, TicketId, Timestamp};
use podbox_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, IdentityCommitment};
use serde::{Deserialize, Serialize};

use crate::error::{PcdVerificationError, ProofConstructionError};
use crate::serialized::{Pcd, PcdType};

/// The ticket fields a pipeline attests to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketData {
    pub ticket_id: TicketId,
    pub event_id: EventId,
    pub product_id: ProductId,
    pub event_name: String,
    pub ticket_name: String,
    pub attendee_name: String,
    pub attendee_email: EmailAddress,
    /// Commitment of the holder who polled the feed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_semaphore_id: Option<IdentityCommitment>,
    pub is_consumed: bool,
    pub is_revoked: bool,
    pub timestamp_signed: Timestamp,
}

/// Ticket plus the key that signed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketClaim {
    pub ticket: TicketData,
    pub signer: Ed25519PublicKey,
}

/// A pipeline-signed ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPcd {
    pub id: String,
    pub claim: TicketClaim,
    pub signature: Ed25519Signature,
}

impl TicketPcd {
    /// Sign `ticket` with the pipeline key.
    pub fn prove(signer: &Ed25519KeyPair, ticket: TicketData) -> Result<Self, ProofConstructionError> {
        let signature = signer.sign(&CanonicalBytes::new(&ticket)?);
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            claim: TicketClaim {
                ticket,
                signer: signer.public_key(),
            },
            signature,
        })
    }

    /// The ticket fields.
    pub fn ticket(&self) -> &TicketData {
        &self.claim.ticket
    }

    /// Check the signature against the embedded signer key.
    pub fn verify(&self) -> Result<(), PcdVerificationError> {
        let canonical = CanonicalBytes::new(&self.claim.ticket)?;
        self.claim.signer.verify(&canonical, &self.signature)?;
        Ok(())
    }

    /// Check the signature and that the signer is `pipeline_key`.
    pub fn verify_issued_by(
        &self,
        pipeline_key: &Ed25519PublicKey,
    ) -> Result<(), PcdVerificationError> {
        if &self.claim.signer != pipeline_key {
            return Err(PcdVerificationError::UntrustedSigner(self.claim.signer.to_hex()));
        }
        self.verify()
    }
}

impl Pcd for TicketPcd {
    const TYPE: PcdType = PcdType::EddsaTicket;
    type Body = TicketPcd;

    fn to_body(&self) -> Self::Body {
        self.clone()
    }

    fn from_body(body: Self::Body) -> Result<Self, PcdVerificationError> {
        Ok(body)
    }
}
