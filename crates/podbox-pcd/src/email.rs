//! # Email Attestation Proof
//!
//! An issuer signs the canonical bytes of `{emailAddress, semaphoreId}`,
//! attesting that the address belongs to the identity with that commitment.
//! Servers accept an email proof only when its signer is their configured
//! trusted issuer.

use podbox_core::{CanonicalBytes, EmailAddress};
use podbox_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, IdentityCommitment};
use serde::{Deserialize, Serialize};

use crate::args::EmailProofArgs;
use crate::error::{ArgumentError, PcdVerificationError, ProofConstructionError};
use crate::serialized::{Pcd, PcdType};

/// The attested statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailClaim {
    /// Attested address, normalized.
    pub email_address: EmailAddress,
    /// Commitment of the identity that owns the address.
    pub semaphore_id: IdentityCommitment,
}

/// A signed email attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPcd {
    /// Proof id.
    pub id: String,
    /// The attested statement.
    pub claim: EmailClaim,
    /// Issuer public key.
    pub signer: Ed25519PublicKey,
    /// Issuer signature over the canonical claim.
    pub signature: Ed25519Signature,
}

impl EmailPcd {
    /// Build an attestation from typed arguments.
    pub fn prove(args: EmailProofArgs) -> Result<Self, ProofConstructionError> {
        let issuer = Ed25519KeyPair::from_seed_hex(&args.private_key)?;
        let email = EmailAddress::parse(&args.email_address).map_err(|e| {
            ArgumentError::Malformed {
                name: "emailAddress",
                reason: e.to_string(),
            }
        })?;
        let semaphore_id = IdentityCommitment::from_hex(&args.semaphore_id).map_err(|e| {
            ArgumentError::Malformed {
                name: "semaphoreId",
                reason: e.to_string(),
            }
        })?;
        Self::attest(&issuer, args.id, email, semaphore_id)
    }

    /// Build an attestation with an already-parsed issuer key.
    pub fn attest(
        issuer: &Ed25519KeyPair,
        id: impl Into<String>,
        email_address: EmailAddress,
        semaphore_id: IdentityCommitment,
    ) -> Result<Self, ProofConstructionError> {
        let claim = EmailClaim {
            email_address,
            semaphore_id,
        };
        let signature = issuer.sign(&CanonicalBytes::new(&claim)?);
        Ok(Self {
            id: id.into(),
            claim,
            signer: issuer.public_key(),
            signature,
        })
    }

    /// Check the signature against the embedded signer key.
    pub fn verify(&self) -> Result<(), PcdVerificationError> {
        let canonical = CanonicalBytes::new(&self.claim)?;
        self.signer.verify(&canonical, &self.signature)?;
        Ok(())
    }

    /// Check the signature and that the signer is `issuer`.
    pub fn verify_issued_by(&self, issuer: &Ed25519PublicKey) -> Result<(), PcdVerificationError> {
        if &self.signer != issuer {
            return Err(PcdVerificationError::UntrustedSigner(self.signer.to_hex()));
        }
        self.verify()
    }
}

impl Pcd for EmailPcd {
    const TYPE: PcdType = PcdType::Email;
    type Body = EmailPcd;

    fn to_body(&self) -> Self::Body {
        self.clone()
    }

    fn from_body(body: Self::Body) -> Result<Self, PcdVerificationError> {
        Ok(body)
    }
}
