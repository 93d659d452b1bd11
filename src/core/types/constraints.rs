//! Caller-supplied routing constraints

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard bounds a model must satisfy to be eligible
///
/// An absent field leaves that axis unconstrained. Values are validated on
/// construction, so a `Constraints` value is always well-formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Constraints {
    max_cost: Option<f64>,
    max_latency_ms: Option<u64>,
    min_quality: Option<f64>,
}

impl Constraints {
    /// Build constraints, rejecting malformed values
    pub fn new(
        max_cost: Option<f64>,
        max_latency_ms: Option<u64>,
        min_quality: Option<f64>,
    ) -> Result<Self> {
        if let Some(cost) = max_cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(GatewayError::InvalidConstraint(format!(
                    "max_cost must be a non-negative number, got {}",
                    cost
                )));
            }
        }

        if let Some(quality) = min_quality {
            if !quality.is_finite() || !(0.0..=1.0).contains(&quality) {
                return Err(GatewayError::InvalidConstraint(format!(
                    "min_quality must be between 0 and 1, got {}",
                    quality
                )));
            }
        }

        Ok(Self {
            max_cost,
            max_latency_ms,
            min_quality,
        })
    }

    /// Constraints that admit every active model
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Maximum cost per request
    pub fn max_cost(&self) -> Option<f64> {
        self.max_cost
    }

    /// Maximum expected latency in milliseconds
    pub fn max_latency_ms(&self) -> Option<u64> {
        self.max_latency_ms
    }

    /// Minimum static quality score
    pub fn min_quality(&self) -> Option<f64> {
        self.min_quality
    }

    /// Fill unset axes from `defaults`
    pub fn or(self, defaults: &Constraints) -> Self {
        Self {
            max_cost: self.max_cost.or(defaults.max_cost),
            max_latency_ms: self.max_latency_ms.or(defaults.max_latency_ms),
            min_quality: self.min_quality.or(defaults.min_quality),
        }
    }

    /// True when no axis is constrained
    pub fn is_unconstrained(&self) -> bool {
        self.max_cost.is_none() && self.max_latency_ms.is_none() && self.min_quality.is_none()
    }
}

impl<'de> Deserialize<'de> for Constraints {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            max_cost: Option<f64>,
            #[serde(default)]
            max_latency_ms: Option<u64>,
            #[serde(default)]
            min_quality: Option<f64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Constraints::new(raw.max_cost, raw.max_latency_ms, raw.min_quality)
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            return write!(f, "unconstrained");
        }

        let mut parts = Vec::new();
        if let Some(cost) = self.max_cost {
            parts.push(format!("max_cost={}", cost));
        }
        if let Some(latency) = self.max_latency_ms {
            parts.push(format!("max_latency_ms={}", latency));
        }
        if let Some(quality) = self.min_quality {
            parts.push(format!("min_quality={}", quality));
        }
        write!(f, "{}", parts.join(", "))
    }
}
