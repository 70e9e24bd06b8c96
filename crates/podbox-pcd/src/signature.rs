//! # Credential Signature Wrapper
//!
//! [`sign`] canonicalizes a payload, signs the canonical bytes with an
//! [`Identity`], and packages the exact signed string together with the
//! signer's public key and the signature.
//!
//! ## Security Invariant
//!
//! The verifier checks the signature over `signedMessage` as received and
//! decodes the payload from those same bytes. Nothing is re-serialized
//! between the signature check and the decode, so the payload a verifier acts
//! on is always the payload that was signed. The decoded payload is only
//! reachable through [`VerifiedCredential`].
//!
//! On the wire a credential is a `semaphore-signature-pcd` envelope.

use podbox_core::CanonicalBytes;
use podbox_crypto::{Ed25519PublicKey, Ed25519Signature, Identity, IdentityCommitment};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PcdVerificationError, ProofConstructionError};
use crate::serialized::{Pcd, PcdType, SerializedPcd};

/// A payload signed by an identity. Opaque until verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCredential {
    signed_message: String,
    public_key: Ed25519PublicKey,
    signature: Ed25519Signature,
}

/// Wire body of a credential.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignedCredentialBody {
    signed_message: String,
    public_key: Ed25519PublicKey,
    signature: Ed25519Signature,
}

/// Sign `payload` with `identity`.
///
/// # Errors
///
/// `ProofConstructionError::Canonicalization` if the payload cannot be
/// canonicalized (for example, it contains a float).
pub fn sign<T: Serialize>(
    identity: &Identity,
    payload: &T,
) -> Result<SignedCredential, ProofConstructionError> {
    let canonical = CanonicalBytes::new(payload)?;
    let signature = identity.sign(&canonical);
    Ok(SignedCredential {
        signed_message: canonical.into_string(),
        public_key: identity.public_key(),
        signature,
    })
}

impl SignedCredential {
    /// The claimed signer. Not authenticated until [`Self::verify`] succeeds.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// Verify the signature over the exact signed bytes and decode the
    /// payload from them.
    pub fn verify<T: DeserializeOwned>(&self) -> Result<VerifiedCredential<T>, PcdVerificationError> {
        let canonical = CanonicalBytes::from_canonical_str(&self.signed_message)?;
        self.public_key.verify(&canonical, &self.signature)?;
        let payload: T = serde_json::from_slice(canonical.as_bytes())?;
        let commitment = IdentityCommitment::derive(&self.public_key)?;
        Ok(VerifiedCredential {
            payload,
            commitment,
            public_key: self.public_key,
        })
    }
}

impl Pcd for SignedCredential {
    const TYPE: PcdType = PcdType::SemaphoreSignature;
    type Body = SignedCredentialBody;

    fn to_body(&self) -> Self::Body {
        SignedCredentialBody {
            signed_message: self.signed_message.clone(),
            public_key: self.public_key,
            signature: self.signature,
        }
    }

    fn from_body(body: Self::Body) -> Result<Self, PcdVerificationError> {
        Ok(Self {
            signed_message: body.signed_message,
            public_key: body.public_key,
            signature: body.signature,
        })
    }
}

impl Serialize for SignedCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.serialize_pcd()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SignedCredential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let envelope = SerializedPcd::deserialize(deserializer)?;
        Self::deserialize_pcd(&envelope).map_err(serde::de::Error::custom)
    }
}

/// A credential whose signature has been checked.
///
/// Only [`SignedCredential::verify`] constructs this type.
#[derive(Debug, Clone)]
pub struct VerifiedCredential<T> {
    payload: T,
    commitment: IdentityCommitment,
    public_key: Ed25519PublicKey,
}

impl<T> VerifiedCredential<T> {
    /// The decoded payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consume into the decoded payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Commitment re-derived from the signer's public key.
    pub fn commitment(&self) -> IdentityCommitment {
        self.commitment
    }

    /// The authenticated signer key.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn sign_then_verify_returns_payload_and_commitment() {
        let id = Identity::generate().unwrap();
        let payload = json!({"action": "poll", "timestamp": "2026-01-01T00:00:00Z"});
        let cred = sign(&id, &payload).unwrap();
        let verified = cred.verify::<Value>().unwrap();
        assert_eq!(verified.payload(), &payload);
        assert_eq!(verified.commitment(), id.commitment());
    }

    #[test]
    fn float_payload_is_a_construction_error() {
        let id = Identity::generate().unwrap();
        let err = sign(&id, &json!({"amount": 1.5})).unwrap_err();
        assert!(matches!(err, ProofConstructionError::Canonicalization(_)));
    }

    #[test]
    fn byte_drift_in_signed_message_is_rejected() {
        let id = Identity::generate().unwrap();
        let mut cred = sign(&id, &json!({"a": 1, "b": 2})).unwrap();
        // Same JSON value, different bytes.
        cred.signed_message = "{\"a\": 1, \"b\": 2}".to_string();
        assert!(matches!(
            cred.verify::<Value>(),
            Err(PcdVerificationError::NotCanonical(_))
        ));
    }

    #[test]
    fn altered_payload_is_rejected() {
        let id = Identity::generate().unwrap();
        let mut cred = sign(&id, &json!({"ticketId": "a"})).unwrap();
        cred.signed_message = r#"{"ticketId":"b"}"#.to_string();
        assert!(matches!(
            cred.verify::<Value>(),
            Err(PcdVerificationError::Signature(_))
        ));
    }

    #[test]
    fn swapped_public_key_is_rejected() {
        let id = Identity::generate().unwrap();
        let other = Identity::generate().unwrap();
        let mut cred = sign(&id, &json!({"x": 1})).unwrap();
        cred.public_key = other.public_key();
        assert!(cred.verify::<Value>().is_err());
    }

    #[test]
    fn payload_of_wrong_shape_is_malformed() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Expected {
            action: String,
        }
        let id = Identity::generate().unwrap();
        let cred = sign(&id, &json!({"unexpected": true})).unwrap();
        assert!(matches!(
            cred.verify::<Expected>(),
            Err(PcdVerificationError::Malformed(_))
        ));
    }

    #[test]
    fn wire_form_is_a_signature_envelope() {
        let id = Identity::generate().unwrap();
        let cred = sign(&id, &json!({"x": 1})).unwrap();
        let wire = serde_json::to_value(&cred).unwrap();
        assert_eq!(wire["type"], "semaphore-signature-pcd");
        let body: Value = serde_json::from_str(wire["pcd"].as_str().unwrap()).unwrap();
        assert_eq!(body["signedMessage"], r#"{"x":1}"#);

        let back: SignedCredential = serde_json::from_value(wire).unwrap();
        assert_eq!(back, cred);
        back.verify::<Value>().unwrap();
    }

    #[test]
    fn envelope_of_other_type_does_not_decode() {
        let wire = json!({"type": "email-pcd", "pcd": "{}"});
        assert!(serde_json::from_value::<SignedCredential>(wire).is_err());
    }
}
