//! # podbox-crypto: Keys and Identities
//!
//! - **Ed25519** signing and verification. The signing input is always
//!   `&CanonicalBytes`.
//! - **Identity**: a private Ed25519 seed held by a requesting party, and the
//!   public **commitment** derived from it. The commitment is what an email
//!   attestation binds an address to, and what the server re-derives from a
//!   credential's public key.
//!
//! ## Crate Policy
//!
//! - Depends only on `podbox-core` internally.
//! - No mocking of cryptographic operations in tests; every test signs and
//!   verifies with real Ed25519 keys.
//! - Seeds are zeroized on drop and never appear in `Debug` output.

pub mod ed25519;
pub mod identity;

pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use identity::{Identity, IdentityCommitment};
