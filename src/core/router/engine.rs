//! Routing engine
//!
//! Estimates complexity, runs the selector and packages the ranked list into
//! a [`RoutingDecision`]: the primary followed by every other eligible model
//! in rank order. With a `max_fallbacks` cap, ranked alternatives past the cap
//! are dropped unless they are configured fallback models.

use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info};

use super::complexity::ComplexityEstimator;
use super::selection::ModelSelector;
use super::strategy::{RoutingStrategy, StrategyKind};
use crate::core::types::{Constraints, ModelRegistry, Request, RoutingDecision};
use crate::utils::error::{GatewayError, Result};

/// Produces a routing decision per request
#[derive(Debug)]
pub struct RoutingEngine {
    registry: Arc<ModelRegistry>,
    estimator: ComplexityEstimator,
    selector: ModelSelector,
    strategy: Arc<dyn RoutingStrategy>,
    fallback_models: ArcSwap<Vec<String>>,
    max_fallbacks: Option<usize>,
}

impl RoutingEngine {
    /// Engine over `registry` using `strategy` by default
    pub fn new(registry: Arc<ModelRegistry>, strategy: Arc<dyn RoutingStrategy>) -> Result<Self> {
        if registry.is_empty() {
            return Err(GatewayError::configuration(
                "Routing engine needs at least one model",
            ));
        }
        Ok(Self {
            registry,
            estimator: ComplexityEstimator::default(),
            selector: ModelSelector::new(),
            strategy,
            fallback_models: ArcSwap::from_pointee(Vec::new()),
            max_fallbacks: None,
        })
    }

    /// Replace the complexity estimator (builder pattern)
    pub fn with_estimator(mut self, estimator: ComplexityEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Cap the ranked alternatives kept after the primary (builder pattern)
    ///
    /// Without a cap every eligible model stays in the decision.
    pub fn with_max_fallbacks(mut self, max_fallbacks: usize) -> Self {
        self.max_fallbacks = Some(max_fallbacks);
        self
    }

    /// Set the configured fallback models (builder pattern)
    pub fn with_fallback_models(self, models: Vec<String>) -> Self {
        self.set_fallback_models(models);
        self
    }

    /// Atomically replace the configured fallback models
    pub fn set_fallback_models(&self, models: Vec<String>) {
        info!("Fallback models set to [{}]", models.join(", "));
        self.fallback_models.store(Arc::new(models));
    }

    /// Currently configured fallback models
    pub fn fallback_models(&self) -> Vec<String> {
        self.fallback_models.load().as_ref().clone()
    }

    /// Model catalog
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Name of the default strategy
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Complexity of a request
    pub fn estimate(&self, request: &Request) -> f64 {
        self.estimator.estimate(request)
    }

    /// Route with the default strategy
    pub fn route(&self, request: &Request, constraints: &Constraints) -> Result<RoutingDecision> {
        self.route_with(request, constraints, self.strategy.as_ref())
    }

    /// Route with a named strategy instead of the default
    pub fn route_with_kind(
        &self,
        request: &Request,
        constraints: &Constraints,
        kind: StrategyKind,
    ) -> Result<RoutingDecision> {
        let strategy = kind.build();
        self.route_with(request, constraints, strategy.as_ref())
    }

    /// Route with an explicit strategy
    pub fn route_with(
        &self,
        request: &Request,
        constraints: &Constraints,
        strategy: &dyn RoutingStrategy,
    ) -> Result<RoutingDecision> {
        let complexity = self.estimator.estimate(request);
        let selection =
            self.selector
                .select(&self.registry, request, constraints, strategy, complexity)?;

        let mut ranked = selection.candidates;
        let candidates = match self.max_fallbacks {
            Some(max_fallbacks) if !selection.forced => {
                let keep = max_fallbacks.saturating_add(1).min(ranked.len());
                let overflow = ranked.split_off(keep);
                let configured = self.fallback_models.load();
                for model_id in configured.iter() {
                    let already_present = ranked.iter().any(|c| &c.model_id == model_id);
                    if already_present {
                        continue;
                    }
                    // Only models that passed filtering may be appended
                    if let Some(candidate) = overflow.iter().find(|c| &c.model_id == model_id) {
                        ranked.push(candidate.clone());
                    }
                }
                ranked
            }
            _ => ranked,
        };

        let decision =
            RoutingDecision::new(candidates, strategy.name(), complexity, selection.forced);
        debug!(
            "Routing decision: [{}] via {} (complexity {:.2})",
            decision.model_ids().join(", "),
            decision.strategy(),
            complexity
        );
        Ok(decision)
    }

    /// One line describing a decision
    pub fn explain(&self, decision: &RoutingDecision) -> String {
        let Some(primary) = decision.primary() else {
            return "No candidates selected".to_string();
        };

        let mut explanation = if decision.is_forced() {
            format!(
                "Selected {} from provider {} (forced by request metadata).",
                primary.model_id, primary.provider
            )
        } else {
            let cost = self
                .registry
                .get(&primary.model_id)
                .map(|p| p.cost_per_request)
                .unwrap_or_default();
            format!(
                "Selected {} from provider {} using {} strategy at complexity {:.2}, estimated cost {:.4}.",
                primary.model_id,
                primary.provider,
                decision.strategy(),
                decision.complexity(),
                cost
            )
        };

        let alternatives: Vec<&str> = decision
            .fallbacks()
            .iter()
            .take(3)
            .map(|c| c.model_id.as_str())
            .collect();
        if !alternatives.is_empty() {
            explanation.push_str(&format!(
                " Alternatives considered: {}.",
                alternatives.join(", ")
            ));
        }
        explanation
    }
}
