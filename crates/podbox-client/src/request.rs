//! # Result Mapping Boundary
//!
//! [`http_post_simple`] is the only place a transport outcome becomes an
//! [`ActionResult`]. The mapping itself lives in [`map_response`] so it can be
//! tested without I/O:
//!
//! | outcome                                   | result                          |
//! |-------------------------------------------|---------------------------------|
//! | no response                               | `TransportError`                |
//! | 2xx + success envelope                    | `success: true`                 |
//! | any status + failure envelope             | that failure                    |
//! | anything else                             | `TransportError` (status, body) |

use podbox_core::{ActionResult, ErrorName};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::TransportError;
use crate::transport::{Transport, TransportResponse};

const MAX_BODY_IN_DETAIL: usize = 512;

/// POST `body` to `url` and map whatever happens into an [`ActionResult`].
pub async fn http_post_simple<T, B, R>(
    transport: &T,
    url: &str,
    body: &B,
    bearer_token: Option<&str>,
) -> ActionResult<R>
where
    T: Transport,
    B: Serialize,
    R: DeserializeOwned,
{
    let outcome = send(transport, url, body, bearer_token).await;
    map_response(url, outcome)
}

async fn send<T: Transport, B: Serialize>(
    transport: &T,
    url: &str,
    body: &B,
    bearer_token: Option<&str>,
) -> Result<TransportResponse, TransportError> {
    let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let json = serde_json::to_value(body).map_err(|e| TransportError::Encode {
        endpoint: url.to_string(),
        source: e,
    })?;
    transport.post_json(&parsed, &json, bearer_token).await
}

/// Map a transport outcome to an [`ActionResult`].
pub fn map_response<R: DeserializeOwned>(
    endpoint: &str,
    outcome: Result<TransportResponse, TransportError>,
) -> ActionResult<R> {
    let resp = match outcome {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "request failed before a response");
            return ActionResult::failure(ErrorName::TransportError, e.to_string());
        }
    };

    match serde_json::from_str::<ActionResult<R>>(&resp.body) {
        Ok(ActionResult::Success(value)) if resp.is_success() => ActionResult::Success(value),
        Ok(ActionResult::Failure(error)) => {
            tracing::debug!(endpoint, status = resp.status, error = %error, "request denied");
            ActionResult::Failure(error)
        }
        Ok(ActionResult::Success(_)) | Err(_) => {
            tracing::warn!(endpoint, status = resp.status, "unexpected response");
            ActionResult::failure(
                ErrorName::TransportError,
                format!("HTTP {}: {}", resp.status, truncate(&resp.body)),
            )
        }
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_IN_DETAIL {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_BODY_IN_DETAIL).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podbox_core::ErrorDetail;

    fn resp(status: u16, body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn success_envelope_on_2xx_is_success() {
        let r: ActionResult<u32> = map_response("e", resp(200, r#"{"success":true,"value":5}"#));
        assert_eq!(r, ActionResult::Success(5));
    }

    #[test]
    fn unit_success_with_null_value() {
        let r: ActionResult<()> = map_response("e", resp(200, r#"{"success":true,"value":null}"#));
        assert!(r.is_success());
    }

    #[test]
    fn failure_envelope_passes_through_on_200() {
        let r: ActionResult<()> = map_response(
            "e",
            resp(200, r#"{"success":false,"error":{"name":"AlreadyCheckedIn"}}"#),
        );
        assert_eq!(r, ActionResult::Failure(ErrorDetail::new(ErrorName::AlreadyCheckedIn)));
    }

    #[test]
    fn failure_envelope_passes_through_on_4xx() {
        let r: ActionResult<()> = map_response(
            "e",
            resp(401, r#"{"success":false,"error":{"name":"Unauthorized","detail":"no token"}}"#),
        );
        assert_eq!(r.error_name(), Some(ErrorName::Unauthorized));
    }

    #[test]
    fn error_status_without_envelope_is_transport_error() {
        let r: ActionResult<()> = map_response("e", resp(502, "<html>Bad Gateway</html>"));
        let err = r.error().unwrap();
        assert_eq!(err.name, ErrorName::TransportError);
        let detail = err.detail.as_deref().unwrap();
        assert!(detail.contains("502"));
        assert!(detail.contains("Bad Gateway"));
    }

    #[test]
    fn success_envelope_on_error_status_is_transport_error() {
        let r: ActionResult<u32> = map_response("e", resp(500, r#"{"success":true,"value":1}"#));
        assert_eq!(r.error_name(), Some(ErrorName::TransportError));
    }

    #[test]
    fn undecodable_2xx_body_is_transport_error() {
        let r: ActionResult<u32> = map_response("e", resp(200, r#"{"success":true,"value":"x"}"#));
        assert_eq!(r.error_name(), Some(ErrorName::TransportError));
    }

    #[test]
    fn transport_failure_is_transport_error() {
        let r: ActionResult<()> = map_response(
            "e",
            Err(TransportError::Unavailable {
                endpoint: "POST /x".into(),
                reason: "connection refused".into(),
            }),
        );
        let err = r.error().unwrap();
        assert_eq!(err.name, ErrorName::TransportError);
        assert!(err.detail.as_deref().unwrap().contains("connection refused"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(MAX_BODY_IN_DETAIL * 2);
        let r: ActionResult<()> = map_response("e", resp(503, &body));
        let detail = r.error().unwrap().detail.clone().unwrap();
        assert!(detail.len() < body.len());
        assert!(detail.ends_with("..."));
    }
}
