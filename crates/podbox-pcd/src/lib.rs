//! # podbox-pcd: Proof-Carrying Data
//!
//! Proofs travel between client and server as [`SerializedPcd`] envelopes:
//! `{"type": "<pcd type>", "pcd": "<json string>"}`. This crate defines the
//! three proof kinds the check-in protocol uses:
//!
//! - [`EmailPcd`]: an issuer's attestation that an email address belongs to
//!   an identity commitment.
//! - [`TicketPcd`]: a pipeline-signed ticket, delivered through feeds.
//! - [`SignedCredential`]: an identity's signature over the exact canonical
//!   bytes of a credential payload. Its payload is only reachable through
//!   [`SignedCredential::verify`], which returns a [`VerifiedCredential`].
//!
//! Proof construction takes typed, closed argument structs
//! ([`EmailProofArgs`]); a loosely-typed JSON argument bag is accepted only
//! through [`EmailProofArgs::from_json`], which rejects unknown and missing
//! fields.

pub mod args;
pub mod email;
pub mod error;
pub mod serialized;
pub mod signature;
pub mod ticket;

pub use args::EmailProofArgs;
pub use email::{EmailClaim, EmailPcd};
pub use error::{ArgumentError, PcdVerificationError, ProofConstructionError};
pub use serialized::{Pcd, PcdType, SerializedPcd};
pub use signature::{sign, SignedCredential, VerifiedCredential};
pub use ticket::{TicketClaim, TicketData, TicketPcd};
