//! Analytics data types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::types::{Attempt, FailureKind};

/// One terminal attempt, as recorded
///
/// Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Record identifier
    pub id: Uuid,
    /// When the attempt finished
    pub timestamp: DateTime<Utc>,
    /// Model the attempt targeted
    pub model_id: String,
    /// Cost incurred; zero for failures
    pub cost: f64,
    /// Observed latency in milliseconds
    pub latency_ms: u64,
    /// Tokens consumed; zero for failures
    pub tokens: u64,
    /// Whether the attempt succeeded
    pub success: bool,
    /// Failure classification, present only on failure
    pub error_kind: Option<FailureKind>,
    /// Request the attempt belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl UsageRecord {
    /// Record a successful call
    pub fn success(model_id: impl Into<String>, cost: f64, latency_ms: u64, tokens: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            model_id: model_id.into(),
            cost,
            latency_ms,
            tokens,
            success: true,
            error_kind: None,
            request_id: None,
        }
    }

    /// Record a failed call
    pub fn failure(model_id: impl Into<String>, latency_ms: u64, kind: FailureKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            model_id: model_id.into(),
            cost: 0.0,
            latency_ms,
            tokens: 0,
            success: false,
            error_kind: Some(kind),
            request_id: None,
        }
    }

    /// Record for a failed trace entry
    pub fn from_failed_attempt(attempt: &Attempt) -> Self {
        Self::failure(
            attempt.model_id.clone(),
            attempt.latency_ms,
            attempt.error_kind.unwrap_or(FailureKind::Permanent),
        )
    }

    /// Tag the record with its request (builder pattern)
    pub fn for_request(mut self, request_id: Option<&str>) -> Self {
        self.request_id = request_id.map(str::to_string);
        self
    }

    /// Override the timestamp (builder pattern)
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Every record ever stored
    pub fn all() -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        }
    }

    /// The last `hours` hours up to now
    pub fn last_hours(hours: i64) -> Self {
        Self::lookback(Duration::try_hours(hours))
    }

    /// The last `days` days up to now
    pub fn last_days(days: i64) -> Self {
        Self::lookback(Duration::try_days(days))
    }

    /// Window ending now; out-of-range lookbacks reach back to the earliest time
    fn lookback(window: Option<Duration>) -> Self {
        let end = Utc::now();
        let start = window
            .and_then(|window| end.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }

    /// Whether `timestamp` falls inside the window
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Latency distribution in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyPercentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Per-model totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub requests: u64,
    pub failed_requests: u64,
    pub total_cost: f64,
    pub total_tokens: u64,
    pub avg_latency_ms: f64,
    pub success_rate: f64,
}

/// Aggregate over a time range
///
/// `total_requests`, `failed_requests` and `success_rate` count provider
/// attempts, so a request that succeeds after two retries adds three.
/// `distinct_requests` and `request_success_rate` count caller requests by
/// request id; untagged records count as one request each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_cost: f64,
    pub total_requests: u64,
    pub failed_requests: u64,
    /// Fraction of successful records; 0.0 when there are none
    pub success_rate: f64,
    pub distinct_requests: u64,
    /// Fraction of distinct requests with a successful attempt
    pub request_success_rate: f64,
    pub avg_latency_ms: f64,
    pub total_tokens: u64,
    pub latency: LatencyPercentiles,
    pub per_model: HashMap<String, ModelUsage>,
}
