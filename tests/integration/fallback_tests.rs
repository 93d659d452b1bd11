//! Fallback execution integration tests
//!
//! Routes with the engine, executes with scripted providers and checks the
//! attempt trace and the usage it leaves behind.

#[cfg(test)]
mod tests {
    use crate::common::assertions::ResponseAssertions;
    use crate::common::{RecordingSleeper, ScriptedProvider, scripted_factory, standard_registry};
    use model_router::config::RetryConfig;
    use model_router::core::router::{BackoffPolicy, FallbackExecutor};
    use model_router::{
        Constraints, FailureKind, GatewayError, ProviderCompletion, ProviderError, Request,
        RoutingDecision, RoutingEngine, StrategyKind, TimeRange, UsageTracker,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn cheapest_first(request: &Request) -> RoutingDecision {
        RoutingEngine::new(standard_registry(), StrategyKind::CostOptimized.build())
            .unwrap()
            .route(request, &Constraints::unconstrained())
            .unwrap()
    }

    fn policy(max_retries: u32) -> BackoffPolicy {
        BackoffPolicy::from_config(&RetryConfig {
            max_retries,
            base_delay_ms: 100,
            max_delay_ms: 250,
            backoff_multiplier: 2.0,
            jitter: false,
        })
    }

    fn executor(
        providers: &[Arc<ScriptedProvider>],
        max_retries: u32,
    ) -> (FallbackExecutor, UsageTracker, Arc<RecordingSleeper>) {
        let tracker = UsageTracker::in_memory();
        let sleeper = Arc::new(RecordingSleeper::default());
        let executor = FallbackExecutor::new(
            Arc::new(scripted_factory(providers)),
            tracker.clone(),
            policy(max_retries),
        )
        .with_sleeper(sleeper.clone());
        (executor, tracker, sleeper)
    }

    /// Primary times out on every attempt, second candidate rejects the
    /// request, third succeeds
    #[tokio::test]
    async fn test_mixed_failures_then_success() {
        let gemini =
            ScriptedProvider::failing("gemini-flash", ProviderError::timeout("google", "slow"));
        let mini = ScriptedProvider::failing(
            "gpt-4o-mini",
            ProviderError::api_error("openai", 400, "bad request"),
        );
        let haiku = ScriptedProvider::succeeding("claude-3-haiku");
        let (executor, tracker, sleeper) =
            executor(&[gemini.clone(), mini.clone(), haiku.clone()], 3);

        let request = Request::new("Translate 'hello' to French");
        let response = executor
            .execute(&cheapest_first(&request), &request)
            .await
            .unwrap();

        response.assert_served_by("claude-3-haiku");
        response.assert_failures(&[
            FailureKind::Transient,
            FailureKind::Transient,
            FailureKind::Transient,
            FailureKind::Permanent,
        ]);
        assert_eq!(gemini.calls(), 3);
        assert_eq!(mini.calls(), 1);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
        assert!(response.content.contains("Translate"));

        let summary = tracker.summarize(TimeRange::last_hours(1)).await.unwrap();
        assert_eq!(summary.total_requests, 5);
        assert_eq!(summary.failed_requests, 4);
        assert_eq!(summary.per_model["claude-3-haiku"].requests, 1);
        assert_eq!(summary.per_model["gemini-flash"].failed_requests, 3);
    }

    #[tokio::test]
    async fn test_backoff_is_capped() {
        let gemini = ScriptedProvider::failing(
            "gemini-flash",
            ProviderError::rate_limit("google", Some(1)),
        );
        let mini = ScriptedProvider::succeeding("gpt-4o-mini");
        let (executor, _, sleeper) = executor(&[gemini, mini], 4);

        let request = Request::new("hi");
        executor
            .execute(&cheapest_first(&request), &request)
            .await
            .unwrap();

        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(250),
            ]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_carries_full_trace() {
        let providers: Vec<Arc<ScriptedProvider>> = [
            "gemini-flash",
            "gpt-4o-mini",
            "claude-3-haiku",
            "gpt-4o",
            "claude-3-opus",
        ]
        .iter()
        .map(|id| {
            ScriptedProvider::failing(id, ProviderError::provider_unavailable("scripted", "down"))
        })
        .collect();
        let (executor, tracker, _) = executor(&providers, 2);

        let request = Request::new("hi");
        let err = executor
            .execute(&cheapest_first(&request), &request)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::AllProvidersFailed { .. }));
        let attempts = err.attempts();
        assert_eq!(attempts.len(), 10);
        assert_eq!(attempts[0].model_id, "gemini-flash");
        assert_eq!(attempts[9].model_id, "claude-3-opus");
        assert!(attempts.iter().all(|a| !a.is_success()));

        let records = tracker.records(TimeRange::all()).await.unwrap();
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|r| !r.success));
    }

    /// Models without a constructible provider are skipped like permanent failures
    #[tokio::test]
    async fn test_unbuildable_candidates_are_skipped() {
        let opus = ScriptedProvider::new(
            "claude-3-opus",
            vec![Ok(ProviderCompletion::new("deep answer", 0.07, 1_800, 900))],
        );
        let (executor, _, sleeper) = executor(&[opus], 3);

        let request = Request::new("hi");
        let response = executor
            .execute(&cheapest_first(&request), &request)
            .await
            .unwrap();

        response.assert_served_by("claude-3-opus");
        response.assert_failures(&[FailureKind::Configuration; 4]);
        assert_eq!(response.content, "deep answer");
        assert_eq!(response.tokens, 900);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_forced_model_gets_no_fallbacks() {
        let opus =
            ScriptedProvider::failing("claude-3-opus", ProviderError::authentication("a", "no"));
        let gemini = ScriptedProvider::succeeding("gemini-flash");
        let (executor, _, _) = executor(&[opus, gemini.clone()], 3);

        let request = Request::new("hi").force_model("claude-3-opus");
        let err = executor
            .execute(&cheapest_first(&request), &request)
            .await
            .unwrap_err();

        assert_eq!(err.attempts().len(), 1);
        assert_eq!(gemini.calls(), 0);
    }
}
