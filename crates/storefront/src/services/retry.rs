//! Bounded retry for external calls.

use std::future::Future;
use std::time::Duration;

/// Run `op` up to `attempts` times, sleeping `delay` between failures.
///
/// Only use this for idempotent requests; a retried non-idempotent call can
/// duplicate remote side effects.
///
/// # Errors
///
/// Returns the last error once all attempts are exhausted.
pub async fn with_retry<T, E, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);
    let mut last_err = None;
    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt < attempts {
                    tracing::debug!(attempt, error = %e, "Retrying after failure");
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
        }
    }
    // attempts >= 1, so at least one error was recorded
    Err(last_err.expect("retry loop ran at least once"))
}
