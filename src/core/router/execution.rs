//! Retry policy and execution states
//!
//! The fallback executor is an explicit state machine. This module holds the
//! pieces that decide transitions: the backoff policy, the retry decision
//! for a failed attempt and the sleep abstraction used between retries.

use async_trait::async_trait;
use rand::Rng;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::core::traits::Provider;
use crate::core::types::{FailureKind, Response};

/// Exponential backoff bounds for one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: bool,
}

impl BackoffPolicy {
    /// Policy from configuration; at least one attempt is always made
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            multiplier: if config.backoff_multiplier.is_finite() {
                config.backoff_multiplier.max(1.0)
            } else {
                1.0
            },
            jitter: config.jitter,
        }
    }

    /// Attempts allowed per candidate, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after failed attempt number `attempt` (1-based)
    ///
    /// `base * multiplier^(attempt - 1)`, capped at the maximum delay.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = self.base_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        let delay = Duration::from_millis(capped as u64);

        if self.jitter && !delay.is_zero() {
            let low = delay.as_millis() as u64 / 2;
            let high = delay.as_millis() as u64;
            Duration::from_millis(rand::thread_rng().gen_range(low..=high))
        } else {
            delay
        }
    }

    /// What to do after attempt number `attempt` failed with `kind`
    ///
    /// Only transient failures are retried, and only while attempts remain.
    pub fn after_failure(&self, attempt: u32, kind: FailureKind) -> RetryDecision {
        if kind.is_retryable() && attempt < self.max_attempts {
            RetryDecision::Retry(self.delay_for(attempt))
        } else {
            RetryDecision::Advance
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Outcome of [`BackoffPolicy::after_failure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait, then attempt the same candidate again
    Retry(Duration),
    /// Move on to the next candidate without waiting
    Advance,
}

/// Executor states
///
/// `Pending` resolves the candidate's provider, `Attempting` runs one call,
/// `Retrying` waits before the next call to the same candidate and
/// `Advancing` moves to the next candidate. `Succeeded` and `Exhausted` are
/// terminal.
#[derive(Debug, Clone)]
pub enum ExecutionState {
    Pending {
        candidate: usize,
    },
    Attempting {
        candidate: usize,
        attempt: u32,
        provider: Arc<dyn Provider>,
    },
    Retrying {
        candidate: usize,
        attempt: u32,
        delay: Duration,
        provider: Arc<dyn Provider>,
    },
    Advancing {
        candidate: usize,
    },
    Succeeded(Response),
    Exhausted,
}

/// Suspension used between retries
#[async_trait]
pub trait Sleeper: Send + Sync + Debug {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
