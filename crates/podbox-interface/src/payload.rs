//! # Credential Payload Builder
//!
//! A credential payload names the action a client wants, the ticket it
//! targets (for check-in), a freshness timestamp, and the email proof that
//! ties the signing identity to an address. Payloads are immutable once
//! built; the only constructors are [`CredentialPayload::builder`] and the
//! `create_*` helpers, and deserialization re-checks the same rules.
//!
//! | action    | context  |
//! |-----------|----------|
//! | `poll`    | absent   |
//! | `checkin` | required |

use podbox_core::{EventId, TicketId, Timestamp};
use podbox_crypto::Identity;
use podbox_pcd::{sign, PcdType, ProofConstructionError, SerializedPcd, SignedCredential};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the credential authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialAction {
    /// Poll a feed for the holder's tickets.
    #[serde(rename = "poll")]
    Poll,
    /// Check in the ticket named by the payload context.
    #[serde(rename = "checkin")]
    CheckIn,
}

impl std::fmt::Display for CredentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poll => f.write_str("poll"),
            Self::CheckIn => f.write_str("checkin"),
        }
    }
}

/// The ticket a ticket action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TicketActionContext {
    pub event_id: EventId,
    pub ticket_id: TicketId,
}

/// Payload rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// A check-in payload has no ticket context.
    #[error("{0} payload requires an event and ticket context")]
    MissingContext(CredentialAction),

    /// A poll payload carries a ticket context.
    #[error("{0} payload must not carry a ticket context")]
    UnexpectedContext(CredentialAction),

    /// No email proof was supplied.
    #[error("payload requires an email proof")]
    MissingProof,

    /// The embedded proof is not an email proof.
    #[error("payload proof must be an email-pcd, got {0}")]
    WrongProofType(PcdType),
}

/// The signed statement of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPayload")]
pub struct CredentialPayload {
    action: CredentialAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<TicketActionContext>,
    timestamp: Timestamp,
    pcd: SerializedPcd,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPayload {
    action: CredentialAction,
    #[serde(default)]
    context: Option<TicketActionContext>,
    timestamp: Timestamp,
    pcd: SerializedPcd,
}

impl TryFrom<RawPayload> for CredentialPayload {
    type Error = PayloadError;

    fn try_from(raw: RawPayload) -> Result<Self, Self::Error> {
        let mut builder = CredentialPayload::builder(raw.action)
            .timestamp(raw.timestamp)
            .email_proof(raw.pcd);
        if let Some(ctx) = raw.context {
            builder = builder.context(ctx.event_id, ctx.ticket_id);
        }
        builder.build()
    }
}

impl CredentialPayload {
    /// Start building a payload for `action`.
    pub fn builder(action: CredentialAction) -> CredentialPayloadBuilder {
        CredentialPayloadBuilder {
            action,
            context: None,
            timestamp: None,
            pcd: None,
        }
    }

    pub fn action(&self) -> CredentialAction {
        self.action
    }

    pub fn context(&self) -> Option<&TicketActionContext> {
        self.context.as_ref()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The embedded email proof envelope.
    pub fn email_proof(&self) -> &SerializedPcd {
        &self.pcd
    }
}

/// Builder for [`CredentialPayload`].
#[derive(Debug, Clone)]
pub struct CredentialPayloadBuilder {
    action: CredentialAction,
    context: Option<TicketActionContext>,
    timestamp: Option<Timestamp>,
    pcd: Option<SerializedPcd>,
}

impl CredentialPayloadBuilder {
    /// Target a ticket.
    pub fn context(mut self, event_id: EventId, ticket_id: TicketId) -> Self {
        self.context = Some(TicketActionContext {
            event_id,
            ticket_id,
        });
        self
    }

    /// Override the timestamp. Defaults to now.
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Embed the serialized email proof.
    pub fn email_proof(mut self, pcd: SerializedPcd) -> Self {
        self.pcd = Some(pcd);
        self
    }

    /// Check the context rule and the proof type, then build.
    pub fn build(self) -> Result<CredentialPayload, PayloadError> {
        match (self.action, &self.context) {
            (CredentialAction::CheckIn, None) => {
                return Err(PayloadError::MissingContext(self.action))
            }
            (CredentialAction::Poll, Some(_)) => {
                return Err(PayloadError::UnexpectedContext(self.action))
            }
            _ => {}
        }
        let pcd = self.pcd.ok_or(PayloadError::MissingProof)?;
        if pcd.pcd_type != PcdType::Email {
            return Err(PayloadError::WrongProofType(pcd.pcd_type));
        }
        Ok(CredentialPayload {
            action: self.action,
            context: self.context,
            timestamp: self.timestamp.unwrap_or_else(Timestamp::now),
            pcd,
        })
    }
}

/// Payload for polling a feed.
pub fn create_feed_credential_payload(
    email_pcd: SerializedPcd,
) -> Result<CredentialPayload, PayloadError> {
    CredentialPayload::builder(CredentialAction::Poll)
        .email_proof(email_pcd)
        .build()
}

/// Payload for acting on one ticket.
pub fn create_ticket_action_credential_payload(
    email_pcd: SerializedPcd,
    action: CredentialAction,
    event_id: EventId,
    ticket_id: TicketId,
) -> Result<CredentialPayload, PayloadError> {
    CredentialPayload::builder(action)
        .context(event_id, ticket_id)
        .email_proof(email_pcd)
        .build()
}

/// Sign a payload with the holder's identity.
pub fn sign_feed_credential_payload(
    identity: &Identity,
    payload: &CredentialPayload,
) -> Result<SignedCredential, ProofConstructionError> {
    sign(identity, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use podbox_core::{CanonicalBytes, EmailAddress};
    use podbox_crypto::Ed25519KeyPair;
    use podbox_pcd::{EmailPcd, Pcd};

    fn email_pcd(identity: &Identity) -> SerializedPcd {
        EmailPcd::attest(
            &Ed25519KeyPair::generate(),
            "email-id",
            EmailAddress::parse("holder@example.com").unwrap(),
            identity.commitment(),
        )
        .unwrap()
        .serialize_pcd()
        .unwrap()
    }

    #[test]
    fn poll_payload_has_no_context() {
        let id = Identity::generate().unwrap();
        let payload = create_feed_credential_payload(email_pcd(&id)).unwrap();
        assert_eq!(payload.action(), CredentialAction::Poll);
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["action"], "poll");
        assert!(v.get("context").is_none());
    }

    #[test]
    fn checkin_payload_carries_context() {
        let id = Identity::generate().unwrap();
        let (event, ticket) = (EventId::new(), TicketId::new());
        let payload = create_ticket_action_credential_payload(
            email_pcd(&id),
            CredentialAction::CheckIn,
            event,
            ticket,
        )
        .unwrap();
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["action"], "checkin");
        assert_eq!(v["context"]["eventId"], event.0.to_string());
        assert_eq!(v["context"]["ticketId"], ticket.0.to_string());
    }

    #[test]
    fn checkin_without_context_is_rejected() {
        let id = Identity::generate().unwrap();
        let err = CredentialPayload::builder(CredentialAction::CheckIn)
            .email_proof(email_pcd(&id))
            .build()
            .unwrap_err();
        assert_eq!(err, PayloadError::MissingContext(CredentialAction::CheckIn));
    }

    #[test]
    fn poll_with_context_is_rejected() {
        let id = Identity::generate().unwrap();
        let err = create_ticket_action_credential_payload(
            email_pcd(&id),
            CredentialAction::Poll,
            EventId::new(),
            TicketId::new(),
        )
        .unwrap_err();
        assert_eq!(err, PayloadError::UnexpectedContext(CredentialAction::Poll));
    }

    #[test]
    fn missing_or_wrong_proof_is_rejected() {
        let err = CredentialPayload::builder(CredentialAction::Poll).build().unwrap_err();
        assert_eq!(err, PayloadError::MissingProof);

        let wrong = SerializedPcd {
            pcd_type: PcdType::EddsaTicket,
            pcd: "{}".to_string(),
        };
        let err = create_feed_credential_payload(wrong).unwrap_err();
        assert_eq!(err, PayloadError::WrongProofType(PcdType::EddsaTicket));
    }

    #[test]
    fn serialization_is_canonical_and_stable() {
        let id = Identity::generate().unwrap();
        let ts = Timestamp::parse("2026-05-01T10:00:00Z").unwrap();
        let payload = CredentialPayload::builder(CredentialAction::Poll)
            .timestamp(ts)
            .email_proof(email_pcd(&id))
            .build()
            .unwrap();
        let a = CanonicalBytes::new(&payload).unwrap();
        let b = CanonicalBytes::new(&payload.clone()).unwrap();
        assert_eq!(a, b);
        assert!(a.as_str().starts_with(r#"{"action":"poll","pcd":"#));
        assert!(a.as_str().ends_with(r#""timestamp":"2026-05-01T10:00:00Z"}"#));
    }

    #[test]
    fn deserialize_enforces_context_rule() {
        let id = Identity::generate().unwrap();
        let mut v = serde_json::to_value(create_feed_credential_payload(email_pcd(&id)).unwrap())
            .unwrap();
        v["action"] = serde_json::json!("checkin");
        assert!(serde_json::from_value::<CredentialPayload>(v).is_err());
    }

    #[test]
    fn signed_payload_verifies_back_to_itself() {
        let id = Identity::generate().unwrap();
        let payload = create_feed_credential_payload(email_pcd(&id)).unwrap();
        let cred = sign_feed_credential_payload(&id, &payload).unwrap();
        let verified = cred.verify::<CredentialPayload>().unwrap();
        assert_eq!(verified.payload(), &payload);
        assert_eq!(verified.commitment(), id.commitment());
    }
}
