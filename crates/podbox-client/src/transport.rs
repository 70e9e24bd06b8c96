//! # HTTP Transport
//!
//! [`Transport`] is the seam between the request functions and the network.
//! [`HttpTransport`] is the reqwest implementation; tests inject their own to
//! simulate failures without a socket.

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::config::ClientConfig;
use crate::error::TransportError;

/// Status and body of an HTTP response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON POST and returns the raw response.
///
/// Implementations return `Err` only when no response was obtained. An HTTP
/// error status is an `Ok` response.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
        bearer_token: Option<&str>,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// reqwest-backed transport with a request timeout and optional retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    max_retries: u32,
}

impl HttpTransport {
    /// Build from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            max_retries: config.max_retries,
        })
    }
}

impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
        bearer_token: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        let endpoint = format!("POST {}", url.path());
        let resp = crate::retry::retry_send(self.max_retries, || {
            let req = self.http.post(url.clone()).json(body);
            match bearer_token {
                Some(token) => req.bearer_auth(token).send(),
                None => req.send(),
            }
        })
        .await
        .map_err(|e| TransportError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| TransportError::Http {
            endpoint,
            source: e,
        })?;
        Ok(TransportResponse { status, body })
    }
}
