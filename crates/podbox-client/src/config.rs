//! Client configuration.

/// Configuration for [`crate::PodboxClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after a transport failure. HTTP error statuses are never
    /// retried.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PODBOX_TIMEOUT_SECS` (default: 30)
    /// - `PODBOX_MAX_RETRIES` (default: 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            timeout_secs: env_parse("PODBOX_TIMEOUT_SECS", defaults.timeout_secs)?,
            max_retries: env_parse("PODBOX_MAX_RETRIES", defaults.max_retries)?,
        })
    }
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}
