//! Retry loop: run a closure until success or the policy says stop.

use super::error::{FetchError, RetryExhausted};
use super::operation::Operation;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// On failure, sleeps for the policy's fixed delay and tries again. The
/// closure is re-invoked as-is, so it must be safe to repeat. When no retries
/// remain, the last error is returned wrapped in [`RetryExhausted`].
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    operation: &Operation,
    mut f: F,
) -> Result<T, RetryExhausted>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1u32;
    loop {
        tracing::debug!(%operation, attempt, max_attempts, "attempt starting");
        match f() {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(%operation, attempt, "succeeded after retry");
                } else {
                    tracing::debug!(%operation, attempt, "attempt succeeded");
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(%operation, attempt, max_attempts, error = %e, "attempt failed");
                match policy.decide(attempt) {
                    RetryDecision::NoRetry => {
                        tracing::error!(%operation, attempts = attempt, "retries exhausted");
                        return Err(RetryExhausted {
                            operation: operation.clone(),
                            attempts: attempt,
                            source: e,
                        });
                    }
                    RetryDecision::RetryAfter(d) => {
                        if !d.is_zero() {
                            std::thread::sleep(d);
                        }
                        attempt += 1;
                    }
                }
            }
        }
    }
}
