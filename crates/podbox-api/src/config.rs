//! # Server Configuration
//!
//! Loaded from environment variables at startup:
//!
//! | Variable                          | Default                 |
//! |-----------------------------------|-------------------------|
//! | `PORT`                            | `8080`                  |
//! | `PODBOX_ADMIN_TOKEN`              | unset (auth disabled)   |
//! | `PODBOX_PIPELINES`                | unset (no pipelines)    |
//! | `PODBOX_EMAIL_ISSUER_KEY`         | unset                   |
//! | `PODBOX_CREDENTIAL_MAX_AGE_SECS`  | `3600`                  |
//! | `PODBOX_PUBLIC_URL`               | `http://localhost:8080` |

use std::path::PathBuf;

use podbox_core::{PipelineId, TicketId};
use podbox_crypto::Ed25519PublicKey;
use thiserror::Error;

/// Errors loading configuration or pipeline definitions.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// Pipelines were configured without a trusted email issuer.
    #[error("PODBOX_EMAIL_ISSUER_KEY is required when pipelines are loaded")]
    MissingIssuerKey,

    /// The pipeline file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline file is not valid YAML for the expected schema.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A pipeline definition is internally inconsistent.
    #[error("pipeline {pipeline}: {reason}")]
    InvalidPipeline { pipeline: PipelineId, reason: String },

    /// Two pipelines share an id.
    #[error("duplicate pipeline id {0}")]
    DuplicatePipeline(PipelineId),

    /// A ticket id appears in more than one pipeline.
    #[error("ticket {0} is defined more than once")]
    DuplicateTicket(TicketId),
}

/// Application configuration.
///
/// Custom `Debug` redacts the admin token.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Bearer token for pipeline info. `None` refuses every pipeline-info request.
    pub admin_token: Option<String>,
    /// YAML file of pipeline definitions.
    pub pipelines_path: Option<PathBuf>,
    /// Key of the trusted email attestation issuer.
    pub email_issuer_key: Option<Ed25519PublicKey>,
    /// Oldest credential accepted, in seconds.
    pub credential_max_age_secs: u64,
    /// Base URL clients reach this server at.
    pub public_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("pipelines_path", &self.pipelines_path)
            .field("email_issuer_key", &self.email_issuer_key)
            .field("credential_max_age_secs", &self.credential_max_age_secs)
            .field("public_url", &self.public_url)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            admin_token: None,
            pipelines_path: None,
            email_issuer_key: None,
            credential_max_age_secs: 3600,
            public_url: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Build configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = env_parse("PORT")?.unwrap_or(defaults.port);
        let credential_max_age_secs =
            env_parse("PODBOX_CREDENTIAL_MAX_AGE_SECS")?.unwrap_or(defaults.credential_max_age_secs);

        let email_issuer_key = match std::env::var("PODBOX_EMAIL_ISSUER_KEY") {
            Ok(hex) => Some(Ed25519PublicKey::from_hex(hex.trim()).map_err(|_| {
                ConfigError::InvalidValue {
                    var: "PODBOX_EMAIL_ISSUER_KEY",
                    value: hex,
                }
            })?),
            Err(_) => None,
        };

        Ok(Self {
            port,
            admin_token: std::env::var("PODBOX_ADMIN_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            pipelines_path: std::env::var("PODBOX_PIPELINES").ok().map(PathBuf::from),
            email_issuer_key,
            credential_max_age_secs,
            public_url: std::env::var("PODBOX_PUBLIC_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_url),
        })
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}
