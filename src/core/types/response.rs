//! Response and attempt-trace types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Likely to succeed on retry (timeouts, rate limits, 5xx)
    Transient,
    /// Will fail again unchanged (bad input, auth)
    Permanent,
    /// The provider could not be constructed for the candidate
    Configuration,
}

impl FailureKind {
    /// Only transient failures are retried against the same candidate
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureKind::Transient)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transient => write!(f, "transient"),
            FailureKind::Permanent => write!(f, "permanent"),
            FailureKind::Configuration => write!(f, "configuration"),
        }
    }
}

/// Outcome of one attempt against one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The provider returned a completion
    Success,
    /// The attempt failed
    Failure,
}

/// One entry of the fallback trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Candidate model the attempt targeted
    pub model_id: String,
    /// 1-based attempt number for this candidate
    pub attempt: u32,
    /// Whether the attempt succeeded
    pub outcome: AttemptOutcome,
    /// Failure classification, present only on failure
    pub error_kind: Option<FailureKind>,
    /// Failure message, present only on failure
    pub message: Option<String>,
    /// Observed latency of the attempt in milliseconds
    pub latency_ms: u64,
}

impl Attempt {
    /// Record a successful attempt
    pub fn success(model_id: impl Into<String>, attempt: u32, latency_ms: u64) -> Self {
        Self {
            model_id: model_id.into(),
            attempt,
            outcome: AttemptOutcome::Success,
            error_kind: None,
            message: None,
            latency_ms,
        }
    }

    /// Record a failed attempt
    pub fn failure(
        model_id: impl Into<String>,
        attempt: u32,
        kind: FailureKind,
        message: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            attempt,
            outcome: AttemptOutcome::Failure,
            error_kind: Some(kind),
            message: Some(message.into()),
            latency_ms,
        }
    }

    /// True when the attempt succeeded
    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}

/// Completion returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Generated text
    pub content: String,
    /// Cost incurred by the successful call
    pub cost: f64,
    /// Latency of the successful call in milliseconds
    pub latency_ms: u64,
    /// Tokens consumed by the successful call
    pub tokens: u64,
    /// Model that produced the content
    pub model_used: String,
    /// Every attempt made, in order, ending with the success
    pub attempts: Vec<Attempt>,
}

impl Response {
    /// Number of failed attempts before the success
    pub fn failed_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| !a.is_success()).count()
    }

    /// Whether a candidate other than the primary produced the content
    pub fn used_fallback(&self) -> bool {
        self.attempts
            .first()
            .is_some_and(|first| first.model_id != self.model_used)
    }
}
