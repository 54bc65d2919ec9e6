use crate::ingest::WriteError;
use crate::store::StoreError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Exponential backoff with jitter for transient store failures.
///
/// ```text
/// backoff(n) = min(base_backoff * 2^n, max_backoff)
/// sleep(n)   = backoff(n) * uniform(1 - jitter, 1 + jitter)
/// ```
///
/// Retrying stops after `max_retries` retries, or earlier when the next sleep
/// would push the total time spent sleeping past `max_total_wait`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub max_total_wait: Duration,
    /// Fraction in `[0, 1]`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            max_total_wait: Duration::from_secs(30),
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Un-jittered backoff before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    pub fn jittered_backoff(&self, attempt: u32) -> Duration {
        let jitter = self.jitter.clamp(0.0, 1.0);
        let factor = 1.0 - jitter + rand::random::<f64>() * 2.0 * jitter;
        self.backoff(attempt).mul_f64(factor)
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy gives up.
///
/// `operation` receives the zero-based attempt number.
pub async fn retry_with_jittered_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, WriteError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0u32;
    let mut waited = Duration::ZERO;

    loop {
        let err = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(WriteError::Permanent { source: err }),
            Err(err) => err,
        };

        if attempt >= policy.max_retries {
            return Err(WriteError::Exhausted {
                attempts: attempt + 1,
                last: err,
            });
        }

        let delay = policy.jittered_backoff(attempt);
        if waited + delay > policy.max_total_wait {
            return Err(WriteError::Exhausted {
                attempts: attempt + 1,
                last: err,
            });
        }

        warn!(
            attempt = attempt + 1,
            backoff_ms = delay.as_millis() as u64,
            error = %err,
            "transient store error; backing off"
        );

        sleep(delay).await;
        waited += delay;
        attempt += 1;
    }
}
