//! # Pipeline Definition File
//!
//! Pipelines are loaded once at startup from a YAML document:
//!
//! ```yaml
//! pipelines:
//!   - id: 6a1f...            # pipeline UUID
//!     name: Devconnect
//!     signingKey: 4f3c...    # 64 hex chars, Ed25519 seed
//!     feed: { id: tickets, name: Devconnect Tickets, folder: Devconnect }
//!     events:
//!       - id: 0b7e...
//!         name: Devconnect 2026
//!         products:
//!           - { id: 91c2..., name: GA, checkinEligible: true }
//!           - { id: 3d55..., name: Crew, checkinEligible: true, checker: true }
//!     tickets:
//!       - { id: e4a0..., eventId: 0b7e..., productId: 91c2...,
//!           attendeeName: Ada, attendeeEmail: ada@example.com }
//!     users:
//!       - { email: ops@example.com, isAdmin: true }
//! ```

use std::path::Path;

use podbox_core::{EmailAddress, EventId, FeedId, PipelineId, ProductId, TicketId, UserId};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;

use crate::config::ConfigError;

/// Top-level document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelinesFile {
    pub pipelines: Vec<PipelineDefinition>,
}

/// One pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PipelineDefinition {
    pub id: PipelineId,
    pub name: String,
    pub signing_key: SecretSeed,
    pub feed: FeedDefinition,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
    #[serde(default)]
    pub tickets: Vec<TicketDefinition>,
    #[serde(default)]
    pub users: Vec<UserDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedDefinition {
    pub id: FeedId,
    pub name: String,
    pub folder: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDefinition {
    pub id: EventId,
    pub name: String,
    #[serde(default)]
    pub products: Vec<ProductDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductDefinition {
    pub id: ProductId,
    pub name: String,
    /// Whether tickets of this product can be checked in.
    #[serde(default = "default_true")]
    pub checkin_eligible: bool,
    /// Whether holders of this product may check in other tickets.
    #[serde(default)]
    pub checker: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TicketDefinition {
    pub id: TicketId,
    pub event_id: EventId,
    pub product_id: ProductId,
    pub attendee_name: String,
    pub attendee_email: EmailAddress,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserDefinition {
    #[serde(default)]
    pub id: Option<UserId>,
    pub email: EmailAddress,
    #[serde(default)]
    pub is_admin: bool,
}

fn default_true() -> bool {
    true
}

/// A hex-encoded signing seed, wiped on drop.
#[derive(Clone)]
pub struct SecretSeed(Zeroizing<String>);

impl SecretSeed {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(Zeroizing::new(hex.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretSeed([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for SecretSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Read and parse a pipeline definition file.
pub fn load_pipelines(path: &Path) -> Result<Vec<PipelineDefinition>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: PipelinesFile = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.pipelines)
}
