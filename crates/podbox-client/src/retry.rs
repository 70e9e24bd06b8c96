//! Retry with exponential backoff for transport failures.
//!
//! Only [`reqwest::Error`] send failures are retried. Any HTTP response,
//! whatever its status, is returned to the caller as-is.

use std::time::Duration;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms, ...).
const BASE_DELAY_MS: u64 = 200;

/// Send a request, retrying up to `max_retries` times on transport errors.
pub(crate) async fn retry_send<F, Fut>(
    max_retries: u32,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..max_retries {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt.min(10)));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    "request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}
