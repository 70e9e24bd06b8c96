//! # podbox-client: Generic Issuance Action Client
//!
//! Typed async access to the generic issuance endpoints:
//!
//! - [`PodboxClient::request_poll_feed`]: poll a ticket feed with a signed
//!   `poll` credential.
//! - [`PodboxClient::request_check_in`]: check a ticket in with a signed
//!   `checkin` credential.
//! - [`PodboxClient::request_pipeline_info`]: fetch an administrative summary
//!   with an admin bearer token.
//!
//! ## Never Throws
//!
//! Every method resolves to an [`ActionResult`](podbox_core::ActionResult).
//! Network failures, HTTP error statuses and server denials all come back as
//! `success: false` with a named [`ErrorDetail`](podbox_core::ErrorDetail);
//! callers branch on the result instead of handling errors.
//!
//! ## Transport
//!
//! The client is generic over [`Transport`]. Production code uses
//! [`HttpTransport`] (reqwest, configured timeout, optional retries); tests
//! inject failing or recording transports.

pub mod checkin;
pub mod config;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod request;
pub(crate) mod retry;
pub mod transport;

pub use config::ClientConfig;
pub use error::TransportError;
pub use request::{http_post_simple, map_response};
pub use transport::{HttpTransport, Transport, TransportResponse};

/// Generic issuance client.
#[derive(Debug, Clone)]
pub struct PodboxClient<T = HttpTransport> {
    transport: T,
}

impl PodboxClient<HttpTransport> {
    /// Create a client backed by reqwest.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }
}

impl<T: Transport> PodboxClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }
}
