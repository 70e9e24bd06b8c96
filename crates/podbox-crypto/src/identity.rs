//! # Identities and Commitments
//!
//! An [`Identity`] is the private credential a requesting party holds. Its
//! public [`IdentityCommitment`] is a domain-separated SHA-256 digest of the
//! public key:
//!
//! ```text
//! sha256(JCS({"domain": "podbox.identity.v1", "publicKey": "<hex>"}))
//! ```
//!
//! Email attestations bind an address to a commitment (`semaphoreId`). The
//! server re-derives the commitment from the public key carried in a signed
//! credential and compares.

use podbox_core::error::CryptoError;
use podbox_core::{sha256_digest, CanonicalBytes, ContentDigest};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Domain tag mixed into every identity commitment.
pub const IDENTITY_COMMITMENT_DOMAIN: &str = "podbox.identity.v1";

#[derive(Serialize)]
struct CommitmentPreimage<'a> {
    domain: &'a str,
    #[serde(rename = "publicKey")]
    public_key: String,
}

/// Public commitment to an identity. Serializes as 64 hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityCommitment(ContentDigest);

impl IdentityCommitment {
    /// Derive the commitment for a public key.
    pub fn derive(public_key: &Ed25519PublicKey) -> Result<Self, CryptoError> {
        let preimage = CommitmentPreimage {
            domain: IDENTITY_COMMITMENT_DOMAIN,
            public_key: public_key.to_hex(),
        };
        let canonical = CanonicalBytes::new(&preimage)?;
        Ok(Self(sha256_digest(&canonical)))
    }

    /// Parse a commitment from 64 hex chars.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        ContentDigest::from_hex(hex)
            .map(Self)
            .ok_or_else(|| CryptoError::KeyError(format!("invalid identity commitment: {hex:?}")))
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl std::fmt::Display for IdentityCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A private identity: an Ed25519 key pair plus its cached commitment.
///
/// Not `Clone`, not `Serialize`. Passed by reference to every signing call.
pub struct Identity {
    keypair: Ed25519KeyPair,
    commitment: IdentityCommitment,
}

impl Identity {
    /// Generate a fresh identity.
    pub fn generate() -> Result<Self, CryptoError> {
        Self::from_keypair(Ed25519KeyPair::generate())
    }

    /// Restore an identity from a hex seed.
    pub fn from_seed_hex(hex: &str) -> Result<Self, CryptoError> {
        Self::from_keypair(Ed25519KeyPair::from_seed_hex(hex)?)
    }

    /// Wrap an existing key pair.
    pub fn from_keypair(keypair: Ed25519KeyPair) -> Result<Self, CryptoError> {
        let commitment = IdentityCommitment::derive(&keypair.public_key())?;
        Ok(Self {
            keypair,
            commitment,
        })
    }

    /// The public commitment of this identity.
    pub fn commitment(&self) -> IdentityCommitment {
        self.commitment
    }

    /// The public key of this identity.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Sign canonical bytes with this identity's key.
    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        self.keypair.sign(data)
    }

    /// Export the private seed as hex.
    pub fn seed_hex(&self) -> Zeroizing<String> {
        self.keypair.seed_hex()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}
