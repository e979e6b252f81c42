use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed-delay retry policy for catalog reads.
///
/// `max_retries` counts retries, so the operation runs at most
/// `max_retries + 1` times. Every error is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Defaults: 3 retries, 1000ms apart
    pub fn new() -> Self {
        Self::default()
    }

    /// Run once, never retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

/// Retry an async operation, sleeping `policy.delay` between attempts.
///
/// Returns the first success, or the last error once the retries are spent.
///
/// # Example
/// ```ignore
/// use domain_products::retry::{retry_with_delay, RetryPolicy};
///
/// let products = retry_with_delay(|| repository.list(), RetryPolicy::default()).await?;
/// ```
pub async fn retry_with_delay<F, Fut, T, E>(mut operation: F, policy: RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("Operation succeeded after {} retries", attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                attempt += 1;

                if attempt > policy.max_retries {
                    warn!(attempts = attempt, error = %e, "Operation failed, giving up");
                    return Err(e);
                }

                debug!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt,
                    policy.max_attempts(),
                    e,
                    policy.delay.as_millis()
                );

                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
