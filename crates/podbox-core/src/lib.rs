//! # podbox-core: Foundational Types for Generic Issuance
//!
//! Every other crate in the workspace depends on `podbox-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `PipelineId`, `EventId`,
//!    `TicketId`, `ProductId`, `UserId`, `FeedId`, `EmailAddress`. You
//!    cannot pass a `TicketId` where an `EventId` is expected.
//!
//! 2. **`CanonicalBytes` newtype.** Every signed or digested payload flows
//!    through `CanonicalBytes::new()`, so a signer and a verifier can never
//!    disagree on the byte form of the same value.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces the Z suffix and seconds
//!    precision, so credential payloads canonicalize deterministically.
//!
//! 4. **One result envelope.** `ActionResult<T>` is the tagged success/failure
//!    type shared by the client, the server and the tests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `podbox-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod result;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CryptoError, PodboxError, ValidationError};
pub use identity::{EmailAddress, EventId, FeedId, PipelineId, ProductId, TicketId, UserId};
pub use result::{ActionResult, ErrorDetail, ErrorName};
pub use temporal::Timestamp;
