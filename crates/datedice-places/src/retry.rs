//! Retry with exponential back-off and jitter for place search requests.
//!
//! Only transient failures are retried: network errors, HTTP 429 and 5xx.
//! A 429 waits at least as long as the provider's `Retry-After` asks.
//! Anything else (4xx, malformed JSON) is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::PlaceSearchError;

/// Returns `true` for errors worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &PlaceSearchError) -> bool {
    match err {
        PlaceSearchError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlaceSearchError::RateLimited { .. } => true,
        PlaceSearchError::UnexpectedStatus { status, .. } => *status >= 500,
        PlaceSearchError::Deserialize { .. }
        | PlaceSearchError::InvalidBaseUrl { .. }
        | PlaceSearchError::Provider(_) => false,
    }
}

/// Upper bound on any single wait between attempts.
const MAX_DELAY_MS: u64 = 30_000;

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// See [`retry_delay`] for how long each wait lasts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlaceSearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlaceSearchError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        attempt += 1;
        let delay = retry_delay(&err, attempt, backoff_base_ms);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(MAX_DELAY_MS),
            error = %err,
            "place search failed transiently; backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Wait before retry number `attempt` (1-based).
///
/// Exponential back-off from `backoff_base_ms` with ±25 % jitter. A rate
/// limit waits at least the provider's `Retry-After`. Never exceeds 30 s.
pub(crate) fn retry_delay(err: &PlaceSearchError, attempt: u32, backoff_base_ms: u64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let backoff = backoff_base_ms
        .saturating_mul(1u64 << exponent)
        .min(MAX_DELAY_MS);

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (backoff as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let floor = match err {
        PlaceSearchError::RateLimited { retry_after_secs } => {
            retry_after_secs.saturating_mul(1_000)
        }
        _ => 0,
    };

    Duration::from_millis(jittered.max(floor).min(MAX_DELAY_MS))
}
