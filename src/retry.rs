//! Automatic retry with exponential backoff and jitter.
//!
//! Every API call the client makes runs through [`retry_transient`], so
//! individual resource handlers never carry retry code of their own. The
//! service is eventually consistent and short not-found/throttling windows
//! are expected; retrying centrally absorbs them. Operators who prefer
//! fail-fast behavior (bulk destroys spend a long time retrying) disable
//! the policy via the `disable_auto_retries` setting.

use std::time::Duration;

use rand::Rng;
use tracing::{error, warn};

use crate::error::{ProviderError, Result};

/// Whether the client retries transient service errors.
///
/// On by default. When disabled, the first transient error propagates to
/// the caller unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub enabled: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl RetryPolicy {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Backoff schedule for retried calls.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrySchedule {
    /// Total attempts, the initial call included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on the delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetrySchedule {
    /// A schedule with a different attempt budget, other fields default.
    pub fn with_max_attempts(attempts: u32) -> Self {
        Self {
            max_attempts: attempts,
            ..Default::default()
        }
    }
}

/// Execute an async operation, retrying transient errors with backoff.
///
/// Only [`ProviderError::Transient`] triggers a retry; every other error
/// returns immediately. When the attempt budget runs out the last
/// transient error is surfaced as [`ProviderError::Terminal`] with the
/// attempt count recorded in its message. Jitter of 0.5x to 1.5x is
/// applied to each delay so concurrent callers spread out.
pub async fn retry_transient<F, Fut, T>(
    policy: RetryPolicy,
    schedule: &RetrySchedule,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    if !policy.enabled {
        return operation().await;
    }

    let mut attempt = 0u32;
    let mut delay = schedule.initial_delay;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(ProviderError::Transient(api)) => {
                if attempt >= schedule.max_attempts {
                    error!(
                        operation = %operation_name,
                        attempt = attempt,
                        error = %api,
                        "Giving up after max retries"
                    );
                    return Err(ProviderError::Terminal(api.after_attempts(attempt)));
                }

                // Jitter: 0.5x to 1.5x of the delay
                let jitter = rand::thread_rng().gen_range(0.5..1.5);
                let jittered_delay = Duration::from_secs_f64(delay.as_secs_f64() * jitter);

                warn!(
                    operation = %operation_name,
                    attempt = attempt,
                    error = %api,
                    delay_ms = jittered_delay.as_millis(),
                    "Transient service error, retrying"
                );

                tokio::time::sleep(jittered_delay).await;

                // Exponential backoff, capped at max_delay
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * schedule.backoff_multiplier)
                        .min(schedule.max_delay.as_secs_f64()),
                );
            }
            Err(other) => return Err(other),
        }
    }
}
