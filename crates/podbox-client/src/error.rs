//! Client error types.
//!
//! These never escape a public request method. [`crate::request::map_response`]
//! turns them into `TransportError` failures.

/// A request did not produce an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// reqwest failed to send the request or read the body.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The target URL could not be parsed or joined.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The request body could not be encoded.
    #[error("could not encode request body for {endpoint}: {source}")]
    Encode {
        endpoint: String,
        source: serde_json::Error,
    },
    /// The transport is unavailable for another reason.
    #[error("transport unavailable calling {endpoint}: {reason}")]
    Unavailable { endpoint: String, reason: String },
}
