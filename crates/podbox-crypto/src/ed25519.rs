//! # Ed25519 Keys
//!
//! Holder identities, email issuers and pipelines all sign with Ed25519.
//! Only [`CanonicalBytes`] can be signed or verified, so every signature
//! covers the exact JSON text that travels on the wire.
//!
//! Public keys and signatures travel as lowercase hex strings. Seeds never
//! leave an [`Ed25519KeyPair`] except through [`Ed25519KeyPair::seed_hex`].

use ed25519_dalek::Signer;
use podbox_core::error::CryptoError;
use podbox_core::CanonicalBytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

/// Fixed-width byte newtype carried as hex: parsing, serde, and a short
/// `Debug` form showing the first four bytes.
macro_rules! hex_bytes {
    ($name:ident, $len:literal, $err:path) => {
        impl $name {
            pub fn to_hex(&self) -> String {
                to_hex(&self.0)
            }

            pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
                hex_to_array::<$len>(hex).map(Self).map_err($err)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let hex = String::deserialize(deserializer)?;
                Self::from_hex(&hex).map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}..)", stringify!($name), to_hex(&self.0[..4]))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }
    };
}

/// Verifying half of a signer: an issuer, a pipeline or a holder.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

/// Detached signature over canonical JSON.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

hex_bytes!(Ed25519PublicKey, 32, CryptoError::KeyError);
hex_bytes!(Ed25519Signature, 64, CryptoError::VerificationFailed);

impl Ed25519PublicKey {
    /// Strict verification: small-order keys and non-canonical signature
    /// encodings are rejected.
    pub fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &Ed25519Signature,
    ) -> Result<(), CryptoError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))?;
        key.verify_strict(data.as_bytes(), &ed25519_dalek::Signature::from_bytes(&signature.0))
            .map_err(|e| CryptoError::VerificationFailed(format!("bad signature: {e}")))
    }
}

/// A signing key. Not `Serialize`; `Debug` prints no key material.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519KeyPair {
    pub fn generate() -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Load a key from its 64-character hex seed, as written by `podbox keygen`
    /// or a pipeline definition's `signingKey`.
    pub fn from_seed_hex(hex: &str) -> Result<Self, CryptoError> {
        let seed = Zeroizing::new(hex_to_array::<32>(hex).map_err(CryptoError::KeyError)?);
        Ok(Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&seed),
        })
    }

    pub fn seed_hex(&self) -> Zeroizing<String> {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        Zeroizing::new(to_hex(&*seed))
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_to_array<const N: usize>(hex: &str) -> Result<[u8; N], String> {
    let hex = hex.trim();
    if hex.len() != N * 2 || !hex.is_ascii() {
        return Err(format!("expected {} hex chars", N * 2));
    }
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|e| format!("bad hex at {}: {e}", i * 2))?;
    }
    Ok(out)
}
