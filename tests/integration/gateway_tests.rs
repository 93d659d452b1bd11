//! Gateway facade integration tests
//!
//! Full request path: middleware, constraint resolution, routing,
//! execution, usage tracking and timeouts.

#[cfg(test)]
mod tests {
    use crate::common::assertions::ResponseAssertions;
    use crate::common::{ScriptedProvider, scripted_factory, standard_config};
    use model_router::config::Config;
    use model_router::core::traits::ValidationMiddleware;
    use model_router::{
        CompletionOptions, Gateway, GatewayError, Message, Middleware, MiddlewareChain,
        ModelProfile, ProviderError, Request, Response, StrategyKind, TimeRange,
    };
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn all_succeeding() -> Vec<Arc<ScriptedProvider>> {
        [
            "gpt-4o-mini",
            "gpt-4o",
            "claude-3-haiku",
            "claude-3-opus",
            "gemini-flash",
        ]
        .iter()
        .map(|id| ScriptedProvider::succeeding(id))
        .collect()
    }

    fn gateway(config: &Config, providers: &[Arc<ScriptedProvider>]) -> Gateway {
        Gateway::from_config(config, scripted_factory(providers)).unwrap()
    }

    /// Records the order hooks run in and the request ids it sees
    struct Probe {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Probe {
        fn name(&self) -> &str {
            self.tag
        }

        fn process_request(&self, request: Request) -> model_router::Result<Request> {
            self.log.lock().push(format!(
                "in:{}:{}",
                self.tag,
                request.request_id().is_some()
            ));
            Ok(request)
        }

        fn process_response(&self, response: Response) -> model_router::Result<Response> {
            self.log.lock().push(format!("out:{}", self.tag));
            Ok(response)
        }
    }

    #[tokio::test]
    async fn test_complete_routes_and_records_usage() {
        let gateway = gateway(&standard_config(), &all_succeeding());

        let response = gateway
            .complete("Hello there", CompletionOptions::new())
            .await
            .unwrap();
        response.assert_served_by("gemini-flash");
        assert_eq!(response.content, "[gemini-flash] Hello there");

        let summary = gateway.usage_summary(TimeRange::all()).await.unwrap();
        assert_eq!(summary.total_requests, 1);
        assert_eq!(summary.total_tokens, 64);
    }

    #[tokio::test]
    async fn test_chat_uses_last_user_turn_as_prompt() {
        let gateway = gateway(&standard_config(), &all_succeeding());

        let response = gateway
            .chat(
                vec![
                    Message::system("Be terse."),
                    Message::user("What is Rust?"),
                    Message::assistant("A systems language."),
                    Message::user("Who maintains it?"),
                ],
                CompletionOptions::new().strategy(StrategyKind::QualityOptimized),
            )
            .await
            .unwrap();

        response.assert_served_by("claude-3-opus");
        assert!(response.content.ends_with("Who maintains it?"));
    }

    #[tokio::test]
    async fn test_middleware_wraps_in_order_and_sees_request_id() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new()
            .with(Probe {
                tag: "outer",
                log: Arc::clone(&log),
            })
            .with(Probe {
                tag: "inner",
                log: Arc::clone(&log),
            });
        let gateway = gateway(&standard_config(), &all_succeeding()).with_middleware(chain);

        gateway
            .complete("Hello", CompletionOptions::new())
            .await
            .unwrap();

        assert_eq!(
            *log.lock(),
            vec!["in:outer:true", "in:inner:true", "out:inner", "out:outer"]
        );
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_routing() {
        let providers = all_succeeding();
        let gateway = gateway(&standard_config(), &providers);

        let err = gateway
            .complete("   ", CompletionOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(providers.iter().all(|p| p.calls() == 0));
    }

    #[tokio::test]
    async fn test_oversized_prompt_rejected() {
        let gateway = gateway(&standard_config(), &all_succeeding()).with_middleware(
            MiddlewareChain::new().with(ValidationMiddleware::with_max_prompt_chars(10)),
        );

        let err = gateway
            .complete("this prompt is too long", CompletionOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_options_fail_fast() {
        let gateway = gateway(&standard_config(), &all_succeeding());
        let err = gateway
            .complete("hi", CompletionOptions::new().max_cost(-1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidConstraint(_)));
    }

    #[tokio::test]
    async fn test_default_constraints_fill_unset_axes() {
        let mut config = standard_config();
        config.defaults.max_latency_ms = Some(380);
        let gateway = gateway(&config, &all_succeeding());

        let decision = gateway
            .route(
                &Request::new("hi"),
                &CompletionOptions::new().strategy(StrategyKind::QualityOptimized),
            )
            .unwrap();
        assert_eq!(decision.model_ids(), vec!["claude-3-haiku", "gemini-flash"]);

        let overridden = gateway
            .route(
                &Request::new("hi"),
                &CompletionOptions::new()
                    .strategy(StrategyKind::QualityOptimized)
                    .max_latency_ms(1_000),
            )
            .unwrap();
        assert_eq!(overridden.primary().unwrap().model_id, "gpt-4o");

        let err = gateway
            .complete("hi", CompletionOptions::new().min_quality(0.9))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NoEligibleModel { .. }));
    }

    #[tokio::test]
    async fn test_fallback_through_gateway() {
        let mut providers = all_succeeding();
        providers.retain(|p| p.model_id() != "gemini-flash");
        providers.push(ScriptedProvider::failing(
            "gemini-flash",
            ProviderError::network("google", "connection reset"),
        ));
        let gateway = gateway(&standard_config(), &providers);

        let response = gateway
            .complete("Hello", CompletionOptions::new())
            .await
            .unwrap();

        assert_ne!(response.model_used, "gemini-flash");
        assert_eq!(response.failed_attempts(), 3);
        assert!(response.used_fallback());

        let summary = gateway.usage_summary(TimeRange::all()).await.unwrap();
        assert_eq!(summary.failed_requests, 3);
        assert_eq!(summary.total_requests, 4);
        assert_eq!(summary.distinct_requests, 1);
        assert_eq!(summary.request_success_rate, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_cancels_in_flight_request() {
        let mut config = standard_config();
        config.router.timeout_secs = 1;
        let slow = ScriptedProvider::slow("claude-3-opus", Duration::from_secs(60));
        let gateway = gateway(&config, &[slow.clone()]);

        let err = gateway
            .complete(
                "hi",
                CompletionOptions::new().strategy(StrategyKind::QualityOptimized),
            )
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(err.attempts().is_empty());
        assert_eq!(slow.calls(), 1);

        let summary = gateway.usage_summary(TimeRange::all()).await.unwrap();
        assert_eq!(summary.total_requests, 0);
    }

    #[tokio::test]
    async fn test_caller_cancellation() {
        let gateway = gateway(&standard_config(), &all_succeeding());
        let token = CancellationToken::new();
        token.cancel();

        let err = gateway
            .complete_request(Request::new("hi"), &CompletionOptions::new(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_default_config_keeps_every_eligible_model() {
        let ids: Vec<String> = (0..7).map(|i| format!("m{}", i)).collect();
        let mut config = standard_config();
        config.models = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                ModelProfile::new(id.clone(), "scripted", 0.001 * (i + 1) as f64, 500, 0.8)
            })
            .collect();

        let mut providers: Vec<Arc<ScriptedProvider>> = ids[..6]
            .iter()
            .map(|id| {
                ScriptedProvider::failing(id, ProviderError::api_error("scripted", 400, "bad"))
            })
            .collect();
        providers.push(ScriptedProvider::succeeding("m6"));

        let gateway = gateway(&config, &providers);
        let cheap = CompletionOptions::new().strategy(StrategyKind::CostOptimized);

        let decision = gateway.route(&Request::new("hi"), &cheap).unwrap();
        assert_eq!(decision.model_ids(), ids.iter().map(String::as_str).collect::<Vec<_>>());

        let response = gateway.complete("hi", cheap).await.unwrap();
        response.assert_served_by("m6");
        assert_eq!(response.attempts.len(), 7);
    }

    #[tokio::test]
    async fn test_runtime_reconfiguration() {
        let mut config = standard_config();
        config.router.max_fallbacks = Some(0);
        let gateway = gateway(&config, &all_succeeding());
        let cheap = CompletionOptions::new().strategy(StrategyKind::CostOptimized);

        let before = gateway.route(&Request::new("hi"), &cheap).unwrap();
        assert_eq!(before.model_ids(), vec!["gemini-flash"]);

        gateway.configure_fallback(vec!["claude-3-opus".to_string()]);
        let after = gateway.route(&Request::new("hi"), &cheap).unwrap();
        assert_eq!(after.model_ids(), vec!["gemini-flash", "claude-3-opus"]);

        gateway.set_preferred_provider(Some("anthropic")).unwrap();
        let response = gateway.complete("hi", cheap.clone()).await.unwrap();
        assert_eq!(response.model_used, "claude-3-opus");

        assert!(matches!(
            gateway.set_preferred_provider(Some("nobody")),
            Err(GatewayError::Configuration(_))
        ));
        assert_eq!(gateway.preferred_provider().as_deref(), Some("anthropic"));
    }

    #[tokio::test]
    async fn test_disabled_analytics_records_nothing() {
        let mut config = standard_config();
        config.analytics.enabled = false;
        let gateway = gateway(&config, &all_succeeding());

        gateway
            .complete("hi", CompletionOptions::new())
            .await
            .unwrap();

        let summary = gateway.usage_summary(TimeRange::all()).await.unwrap();
        assert_eq!(summary.total_requests, 0);
    }

    #[test]
    fn test_explain_names_primary_and_alternatives() {
        let gateway = gateway(&standard_config(), &all_succeeding());
        let decision = gateway
            .route(
                &Request::new("hi"),
                &CompletionOptions::new().strategy(StrategyKind::CostOptimized),
            )
            .unwrap();

        let text = gateway.explain(&decision);
        assert!(text.starts_with("Selected gemini-flash from provider google"));
        assert!(text.contains("cost_optimized"));
        assert!(text.contains("Alternatives considered: gpt-4o-mini, claude-3-haiku, gpt-4o."));
    }
}
