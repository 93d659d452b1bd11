//! Router configuration

use super::*;
use crate::core::router::StrategyKind;
use crate::core::types::Constraints;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Strategy used when a request does not override it
    #[serde(default)]
    pub default_strategy: StrategyKind,
    /// Models appended after the ranked candidates
    #[serde(default)]
    pub fallback_models: Vec<String>,
    /// Ranked candidates kept after the primary, unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fallbacks: Option<usize>,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            default_strategy: StrategyKind::default(),
            fallback_models: Vec::new(),
            max_fallbacks: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Per-candidate retry and backoff bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per candidate, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the second attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for any single delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Growth factor between consecutive delays
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Randomise each delay within [delay/2, delay]
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

/// Constraints applied to an axis the caller left unset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultConstraints {
    #[serde(default)]
    pub max_cost: Option<f64>,
    #[serde(default)]
    pub max_latency_ms: Option<u64>,
    #[serde(default)]
    pub min_quality: Option<f64>,
}

impl DefaultConstraints {
    /// Validated constraints
    pub fn to_constraints(&self) -> Result<Constraints> {
        Constraints::new(self.max_cost, self.max_latency_ms, self.min_quality)
    }
}
