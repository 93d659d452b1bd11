//! Routing strategies for model selection
//!
//! A strategy scores one profile; higher is better. Scores are pure
//! functions of the profile, the request, its complexity and the registry
//! bounds, so identical inputs always rank identically.

use crate::core::types::{ModelProfile, RegistryBounds, Request};
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Scoring function family
pub trait RoutingStrategy: Send + Sync + fmt::Debug {
    /// Stable identifier recorded on every decision
    fn name(&self) -> &str;

    /// Primary score; higher ranks first
    fn score(
        &self,
        profile: &ModelProfile,
        request: &Request,
        complexity: f64,
        bounds: &RegistryBounds,
    ) -> f64;

    /// Secondary key consulted when primary scores tie; higher ranks first
    fn secondary(&self, _profile: &ModelProfile) -> f64 {
        0.0
    }
}

/// Cheapest first; quality breaks ties
#[derive(Debug, Clone, Copy, Default)]
pub struct CostOptimized;

impl RoutingStrategy for CostOptimized {
    fn name(&self) -> &str {
        "cost_optimized"
    }

    fn score(&self, profile: &ModelProfile, _: &Request, _: f64, _: &RegistryBounds) -> f64 {
        -profile.cost_per_request
    }

    fn secondary(&self, profile: &ModelProfile) -> f64 {
        profile.quality
    }
}

/// Fastest expected latency first
#[derive(Debug, Clone, Copy, Default)]
pub struct LatencyOptimized;

impl RoutingStrategy for LatencyOptimized {
    fn name(&self) -> &str {
        "latency_optimized"
    }

    fn score(&self, profile: &ModelProfile, _: &Request, _: f64, _: &RegistryBounds) -> f64 {
        -(profile.latency_ms as f64)
    }
}

/// Highest static quality first
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityOptimized;

impl RoutingStrategy for QualityOptimized {
    fn name(&self) -> &str {
        "quality_optimized"
    }

    fn score(&self, profile: &ModelProfile, _: &Request, _: f64, _: &RegistryBounds) -> f64 {
        profile.quality
    }
}

/// Weighted blend of cost, latency and quality
///
/// The quality weight grows linearly with complexity from
/// [`Balanced::MIN_QUALITY_WEIGHT`] to
/// `MIN_QUALITY_WEIGHT + QUALITY_WEIGHT_SPAN`; cost and latency share the
/// remainder in a fixed ratio, so the weights always sum to one. Cost and
/// latency are normalised against the whole registry, not just the filtered
/// survivors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Balanced;

impl Balanced {
    pub const MIN_QUALITY_WEIGHT: f64 = 0.2;
    pub const QUALITY_WEIGHT_SPAN: f64 = 0.6;
    /// Share of the non-quality weight given to cost
    pub const COST_SHARE: f64 = 0.55;

    /// (cost, latency, quality) weights for a complexity
    pub fn weights(complexity: f64) -> (f64, f64, f64) {
        let complexity = if complexity.is_nan() {
            0.0
        } else {
            complexity.clamp(0.0, 1.0)
        };
        let quality = Self::MIN_QUALITY_WEIGHT + Self::QUALITY_WEIGHT_SPAN * complexity;
        let rest = 1.0 - quality;
        let cost = rest * Self::COST_SHARE;
        (cost, rest - cost, quality)
    }
}

impl RoutingStrategy for Balanced {
    fn name(&self) -> &str {
        "balanced"
    }

    fn score(
        &self,
        profile: &ModelProfile,
        _: &Request,
        complexity: f64,
        bounds: &RegistryBounds,
    ) -> f64 {
        let (w_cost, w_latency, w_quality) = Self::weights(complexity);
        let cost = bounds.normalize_cost(profile.cost_per_request);
        let latency = bounds.normalize_latency(profile.latency_ms as f64);

        w_cost * -cost + w_latency * -latency + w_quality * profile.quality
    }
}

/// Named strategies selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Balanced,
    CostOptimized,
    QualityOptimized,
    LatencyOptimized,
}

impl StrategyKind {
    /// Every strategy kind
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Balanced,
        StrategyKind::CostOptimized,
        StrategyKind::QualityOptimized,
        StrategyKind::LatencyOptimized,
    ];

    /// Configuration name
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Balanced => "balanced",
            StrategyKind::CostOptimized => "cost_optimized",
            StrategyKind::QualityOptimized => "quality_optimized",
            StrategyKind::LatencyOptimized => "latency_optimized",
        }
    }

    /// Strategy instance for this kind
    pub fn build(self) -> Arc<dyn RoutingStrategy> {
        match self {
            StrategyKind::Balanced => Arc::new(Balanced),
            StrategyKind::CostOptimized => Arc::new(CostOptimized),
            StrategyKind::QualityOptimized => Arc::new(QualityOptimized),
            StrategyKind::LatencyOptimized => Arc::new(LatencyOptimized),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                GatewayError::configuration(format!(
                    "Unknown routing strategy '{}', expected one of: {}",
                    s,
                    Self::ALL.map(StrategyKind::as_str).join(", ")
                ))
            })
    }
}
