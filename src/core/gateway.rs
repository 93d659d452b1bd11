//! Request facade
//!
//! [`Gateway`] is the single entry point: it runs the middleware chain,
//! resolves constraints, asks the routing engine for a decision, hands the
//! decision to the fallback executor and returns the response on the way
//! back out through the chain.

use arc_swap::ArcSwapOption;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::analytics::{TimeRange, UsageSummary, UsageTracker};
use crate::core::providers::ProviderFactory;
use crate::core::router::{BackoffPolicy, FallbackExecutor, RoutingEngine, StrategyKind};
use crate::core::traits::{LoggingMiddleware, MiddlewareChain, ValidationMiddleware};
use crate::core::types::{Constraints, Message, REQUEST_ID_KEY, Request, Response, RoutingDecision};
use crate::utils::error::{GatewayError, Result};
use crate::utils::generate_request_id;

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub max_cost: Option<f64>,
    pub max_latency_ms: Option<u64>,
    pub min_quality: Option<f64>,
    /// Strategy to use instead of the configured default
    pub strategy: Option<StrategyKind>,
    /// Metadata merged into the request
    pub metadata: HashMap<String, Value>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    pub fn max_latency_ms(mut self, max_latency_ms: u64) -> Self {
        self.max_latency_ms = Some(max_latency_ms);
        self
    }

    pub fn min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = Some(min_quality);
        self
    }

    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Validated constraints from the per-call fields
    pub fn constraints(&self) -> Result<Constraints> {
        Constraints::new(self.max_cost, self.max_latency_ms, self.min_quality)
    }
}

/// Routes and executes completion requests
#[derive(Debug)]
pub struct Gateway {
    engine: Arc<RoutingEngine>,
    executor: FallbackExecutor,
    tracker: UsageTracker,
    middleware: MiddlewareChain,
    default_constraints: Constraints,
    preferred_provider: ArcSwapOption<String>,
    timeout: Option<Duration>,
}

impl Gateway {
    /// Gateway over an engine and executor, with no middleware and no timeout
    pub fn new(engine: RoutingEngine, executor: FallbackExecutor, tracker: UsageTracker) -> Self {
        Self {
            engine: Arc::new(engine),
            executor,
            tracker,
            middleware: MiddlewareChain::new(),
            default_constraints: Constraints::unconstrained(),
            preferred_provider: ArcSwapOption::empty(),
            timeout: None,
        }
    }

    /// Wire a gateway from configuration
    ///
    /// `factory` carries the provider registrations; credentials from
    /// `config.providers` are merged into it. The default chain validates
    /// requests and logs traffic.
    pub fn from_config(config: &Config, factory: ProviderFactory) -> Result<Self> {
        info!("Initializing gateway with {} models", config.models.len());
        config.validate()?;

        let registry = Arc::new(config.registry()?);
        let mut engine = RoutingEngine::new(registry, config.router.default_strategy.build())?
            .with_fallback_models(config.router.fallback_models.clone());
        if let Some(max_fallbacks) = config.router.max_fallbacks {
            engine = engine.with_max_fallbacks(max_fallbacks);
        }

        let tracker = UsageTracker::in_memory().with_enabled(config.analytics.enabled);
        let factory = Arc::new(factory.with_settings(config.providers.clone()));
        let executor = FallbackExecutor::new(
            factory,
            tracker.clone(),
            BackoffPolicy::from_config(&config.retry),
        );

        let middleware = MiddlewareChain::new()
            .with(ValidationMiddleware::default())
            .with(LoggingMiddleware);

        debug!(
            "Gateway ready: strategy {}, timeout {}s",
            config.router.default_strategy, config.router.timeout_secs
        );

        Ok(Self::new(engine, executor, tracker)
            .with_middleware(middleware)
            .with_default_constraints(config.default_constraints()?)
            .with_timeout(Some(Duration::from_secs(config.router.timeout_secs))))
    }

    /// Replace the middleware chain (builder pattern)
    pub fn with_middleware(mut self, middleware: MiddlewareChain) -> Self {
        self.middleware = middleware;
        self
    }

    /// Constraints applied to axes a call leaves unset (builder pattern)
    pub fn with_default_constraints(mut self, constraints: Constraints) -> Self {
        self.default_constraints = constraints;
        self
    }

    /// Bound on a whole request, `None` for unbounded (builder pattern)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Routing engine
    pub fn engine(&self) -> &RoutingEngine {
        &self.engine
    }

    /// Usage tracker
    pub fn tracker(&self) -> &UsageTracker {
        &self.tracker
    }

    /// Complete a single prompt
    pub async fn complete(
        &self,
        prompt: impl Into<String>,
        options: CompletionOptions,
    ) -> Result<Response> {
        self.complete_request(Request::new(prompt), &options, &CancellationToken::new())
            .await
    }

    /// Complete a conversation; the last user turn is the prompt
    pub async fn chat(&self, messages: Vec<Message>, options: CompletionOptions) -> Result<Response> {
        self.complete_request(
            Request::from_messages(messages),
            &options,
            &CancellationToken::new(),
        )
        .await
    }

    /// Full request path with caller-controlled cancellation
    pub async fn complete_request(
        &self,
        request: Request,
        options: &CompletionOptions,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        let constraints = self.resolve_constraints(options)?;
        let request = self.prepare(request, options);
        let request = self.middleware.process_request(request)?;

        let decision = self.decide(&request, &constraints, options.strategy)?;
        info!(
            "Request {} routed to {}",
            request.request_id().unwrap_or("-"),
            self.engine.explain(&decision)
        );

        let token = cancel.child_token();
        let execution = self.executor.execute_with_cancel(&decision, &request, &token);

        let response = match self.timeout {
            None => execution.await,
            Some(limit) => {
                tokio::pin!(execution);
                let finished = tokio::select! {
                    result = &mut execution => Some(result),
                    _ = tokio::time::sleep(limit) => None,
                };
                match finished {
                    Some(result) => result,
                    None => {
                        warn!(
                            "Request {} timed out after {:?}",
                            request.request_id().unwrap_or("-"),
                            limit
                        );
                        // The executor observes the token and returns the trace so far
                        token.cancel();
                        execution.await
                    }
                }
            }
        }?;

        self.middleware.process_response(response)
    }

    /// Routing decision for a request without executing it
    pub fn route(&self, request: &Request, options: &CompletionOptions) -> Result<RoutingDecision> {
        let constraints = self.resolve_constraints(options)?;
        let request = self.prepare(request.clone(), options);
        self.decide(&request, &constraints, options.strategy)
    }

    /// Human-readable line for a decision
    pub fn explain(&self, decision: &RoutingDecision) -> String {
        self.engine.explain(decision)
    }

    /// Replace the configured fallback models
    pub fn configure_fallback(&self, models: Vec<String>) {
        self.engine.set_fallback_models(models);
    }

    /// Move one provider's candidates to the front of every decision
    ///
    /// `None` clears the preference. Unknown provider keys are rejected.
    pub fn set_preferred_provider(&self, provider: Option<&str>) -> Result<()> {
        match provider {
            None => {
                self.preferred_provider.store(None);
                info!("Preferred provider cleared");
            }
            Some(key) => {
                if !self.engine.registry().provider_keys().contains(&key) {
                    return Err(GatewayError::configuration(format!(
                        "Unknown provider '{}'",
                        key
                    )));
                }
                self.preferred_provider.store(Some(Arc::new(key.to_string())));
                info!("Preferred provider set to {}", key);
            }
        }
        Ok(())
    }

    /// Currently preferred provider
    pub fn preferred_provider(&self) -> Option<String> {
        self.preferred_provider.load_full().map(|p| p.as_ref().clone())
    }

    /// Usage over `range`
    pub async fn usage_summary(&self, range: TimeRange) -> Result<UsageSummary> {
        self.tracker.summarize(range).await
    }

    fn resolve_constraints(&self, options: &CompletionOptions) -> Result<Constraints> {
        Ok(options.constraints()?.or(&self.default_constraints))
    }

    fn prepare(&self, mut request: Request, options: &CompletionOptions) -> Request {
        for (key, value) in &options.metadata {
            request = request.with_metadata(key.clone(), value.clone());
        }
        if request.request_id().is_none() {
            request = request.with_metadata(REQUEST_ID_KEY, generate_request_id());
        }
        request
    }

    fn decide(
        &self,
        request: &Request,
        constraints: &Constraints,
        strategy: Option<StrategyKind>,
    ) -> Result<RoutingDecision> {
        let decision = match strategy {
            Some(kind) => self.engine.route_with_kind(request, constraints, kind)?,
            None => self.engine.route(request, constraints)?,
        };

        Ok(match self.preferred_provider.load_full() {
            Some(provider) if !decision.is_forced() => decision.prefer_provider(&provider),
            _ => decision,
        })
    }
}
