//! Model selection
//!
//! Hard-constraint filtering, strategy scoring and deterministic ordering.

use std::cmp::Ordering;
use tracing::{debug, warn};

use super::strategy::RoutingStrategy;
use crate::core::types::{Constraints, ModelProfile, ModelRegistry, Request, ScoredCandidate};
use crate::utils::error::{GatewayError, Result};

/// Ranked output of one selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Candidates in attempt order
    pub candidates: Vec<ScoredCandidate>,
    /// True when the request forced its model
    pub forced: bool,
}

/// Filters and ranks registry profiles
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelSelector;

impl ModelSelector {
    pub fn new() -> Self {
        Self
    }

    /// Rank every eligible profile for `request`
    ///
    /// A forced model that exists and is active is returned alone, unscored
    /// and without checking constraints. Otherwise inactive profiles and
    /// profiles violating a constraint are dropped; if none survive the call
    /// fails with [`GatewayError::NoEligibleModel`]. Survivors are ordered by
    /// score, then the strategy's secondary key, then ascending cost, then
    /// model id.
    pub fn select(
        &self,
        registry: &ModelRegistry,
        request: &Request,
        constraints: &Constraints,
        strategy: &dyn RoutingStrategy,
        complexity: f64,
    ) -> Result<Selection> {
        if let Some(forced) = request.forced_model() {
            match registry.get(forced) {
                Some(profile) if profile.active => {
                    debug!("Request forces model {}", forced);
                    return Ok(Selection {
                        candidates: vec![ScoredCandidate {
                            model_id: profile.model_id.clone(),
                            provider: profile.provider.clone(),
                            score: None,
                        }],
                        forced: true,
                    });
                }
                Some(_) => warn!("Forced model {} is inactive, routing normally", forced),
                None => warn!("Forced model {} is not registered, routing normally", forced),
            }
        }

        let eligible: Vec<&ModelProfile> = registry
            .profiles()
            .iter()
            .filter(|profile| profile.satisfies(constraints))
            .collect();

        if eligible.is_empty() {
            return Err(GatewayError::NoEligibleModel {
                constraints: *constraints,
                candidates: registry
                    .profiles()
                    .iter()
                    .map(|p| p.model_id.clone())
                    .collect(),
            });
        }

        let bounds = registry.bounds();
        let mut scored: Vec<(&ModelProfile, f64, f64)> = eligible
            .into_iter()
            .map(|profile| {
                // Adding 0.0 folds -0.0 into 0.0 so equal scores compare equal
                let score = strategy.score(profile, request, complexity, &bounds) + 0.0;
                let secondary = strategy.secondary(profile) + 0.0;
                (profile, score, secondary)
            })
            .collect();

        scored.sort_by(|a, b| rank(a, b));

        debug!(
            "Strategy {} ranked {} eligible models",
            strategy.name(),
            scored.len()
        );

        Ok(Selection {
            candidates: scored
                .into_iter()
                .map(|(profile, score, _)| ScoredCandidate {
                    model_id: profile.model_id.clone(),
                    provider: profile.provider.clone(),
                    score: Some(score),
                })
                .collect(),
            forced: false,
        })
    }
}

fn rank(a: &(&ModelProfile, f64, f64), b: &(&ModelProfile, f64, f64)) -> Ordering {
    b.1.total_cmp(&a.1)
        .then_with(|| b.2.total_cmp(&a.2))
        .then_with(|| a.0.cost_per_request.total_cmp(&b.0.cost_per_request))
        .then_with(|| a.0.model_id.cmp(&b.0.model_id))
}
