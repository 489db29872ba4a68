//! Exponential-backoff retry for promotion server HTTP calls.
//!
//! Retries only transport-level failures (connection refused, timeouts).
//! Status-code classification is the caller's job — a 4xx or 5xx
//! response resolves the future successfully and is never retried here.

use std::time::Duration;

/// Retry attempts after the initial request.
const RETRY_ATTEMPTS: u32 = 3;

/// Base backoff delay; doubles per attempt (200ms, 400ms, 800ms).
const BACKOFF_BASE_MS: u64 = 200;

/// Call `f` until it resolves, backing off between transport failures.
/// The final attempt's error is returned as-is.
pub(crate) async fn send_with_backoff<F, Fut>(f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0u32;
    loop {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < RETRY_ATTEMPTS => {
                let delay = Duration::from_millis(BACKOFF_BASE_MS << attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max = RETRY_ATTEMPTS,
                    "promotion server request failed, backing off {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
