// Retry logic with exponential backoff
//
// Wraps one role call. Both the call itself and the back-off sleep race the
// cancellation token, so shutdown takes effect at the next await point.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::config::RetrySettings;
use crate::errors::CompletionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first; 1 disables retry
    pub max_attempts: u32,
    /// Delay after the first failure; doubles each time
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn fail_fast() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, Duration::from_millis(settings.base_delay_ms))
    }

    /// Back-off after the `failures`-th consecutive failure (1-based).
    pub fn delay_after(&self, failures: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(failures.saturating_sub(1)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fail_fast()
    }
}

/// Why a retried call did not produce a value
#[derive(Debug)]
pub enum Interrupted {
    /// Every attempt failed; carries the last error
    Failed(CompletionError),
    /// The token fired before a value was produced
    Cancelled,
}

/// Run `f` until it succeeds, attempts run out, or `cancel` fires.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    f: F,
) -> Result<T, Interrupted>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, CompletionError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut failures = 0u32;

    loop {
        if cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Interrupted::Cancelled),
            result = f() => result,
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) => {
                failures += 1;
                if failures >= max_attempts {
                    return Err(Interrupted::Failed(e));
                }

                let delay = policy.delay_after(failures);
                tracing::warn!(
                    role = e.role(),
                    "Completion failed (attempt {}/{}), retrying in {:?}: {}",
                    failures,
                    max_attempts,
                    delay,
                    e
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Interrupted::Cancelled),
                    _ = sleep(delay) => {}
                }
            }
        }
    }
}
