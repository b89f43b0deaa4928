// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry with exponential backoff for transient API failures.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};
use tyria_config::RetryConfig;
use tyria_core::ApiError;

/// How often and how patiently to retry a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub retry_delay: Duration,
    /// Double the delay on each subsequent retry.
    pub exponential_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            exponential_backoff: true,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            exponential_backoff: config.exponential_backoff,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based): `retry_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.exponential_backoff {
            let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
            self.retry_delay.saturating_mul(factor)
        } else {
            self.retry_delay
        }
    }
}

/// Runs `op` until it succeeds, fails permanently, or retries run out.
///
/// Only [`ApiError::is_retryable`] failures (network, 429, 5xx) are retried.
/// The error from the final attempt is returned unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt, "request succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    endpoint = %err.endpoint(),
                    kind = %err.kind(),
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "transient API error, will retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
