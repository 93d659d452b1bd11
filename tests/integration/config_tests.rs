//! Configuration integration tests
//!
//! Loads configuration files from disk and builds a working gateway from them.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedProvider, scripted_factory};
    use model_router::config::{Config, LogFormat};
    use model_router::{CompletionOptions, Gateway, GatewayError, StrategyKind};
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn write_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const ROUTER_YAML: &str = r#"
models:
  - model_id: local-small
    provider: local
    cost_per_request: 0.0
    latency_ms: 120
    quality: 0.4
  - model_id: hosted-large
    provider: hosted
    cost_per_request: 0.02
    latency_ms: 900
    quality: 0.92

router:
  default_strategy: quality_optimized
  max_fallbacks: 1
  timeout_secs: 10

retry:
  max_retries: 2
  base_delay_ms: 0
  max_delay_ms: 0

logging:
  level: debug
  format: json
"#;

    #[tokio::test]
    async fn test_yaml_config_drives_gateway() {
        let file = write_config(".yml", ROUTER_YAML);
        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.router.default_strategy, StrategyKind::QualityOptimized);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.retry.backoff_multiplier, 2.0);

        let providers = [
            ScriptedProvider::succeeding("local-small"),
            ScriptedProvider::succeeding("hosted-large"),
        ];
        let gateway = Gateway::from_config(&config, scripted_factory(&providers)).unwrap();

        let response = gateway
            .complete("hello", CompletionOptions::new())
            .await
            .unwrap();
        assert_eq!(response.model_used, "hosted-large");
    }

    #[tokio::test]
    async fn test_json_config() {
        let file = write_config(
            ".json",
            r#"{
                "models": [
                    {"model_id": "m1", "provider": "p", "cost_per_request": 0.01,
                     "latency_ms": 100, "quality": 0.5}
                ],
                "router": {"fallback_models": ["m1"]},
                "analytics": {"enabled": false}
            }"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.router.fallback_models, vec!["m1".to_string()]);
        assert!(!config.analytics.enabled);
        assert_eq!(config.router.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_duplicate_models_rejected() {
        let file = write_config(
            ".yaml",
            r#"
models:
  - {model_id: twin, provider: a, cost_per_request: 0.01, latency_ms: 10, quality: 0.5}
  - {model_id: twin, provider: b, cost_per_request: 0.02, latency_ms: 20, quality: 0.6}
"#,
        );

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
        assert!(err.to_string().contains("Duplicate model id"));
    }

    #[tokio::test]
    async fn test_unknown_strategy_name_rejected() {
        let file = write_config(".yaml", "router:\n  default_strategy: fastest\n");
        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_default_constraints_rejected() {
        let file = write_config(".yaml", "defaults:\n  min_quality: 3.0\n");
        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_written_config_reloads() {
        let config: Config = serde_yaml::from_str(ROUTER_YAML).unwrap();
        let file = write_config(".yaml", &config.to_yaml().unwrap());

        let reloaded = Config::from_file(file.path()).await.unwrap();
        assert_eq!(reloaded.models, config.models);
        assert_eq!(reloaded.retry, config.retry);
    }

    #[test]
    fn test_strategy_names_parse_case_insensitively() {
        assert_eq!(
            "Cost_Optimized".parse::<StrategyKind>().unwrap(),
            StrategyKind::CostOptimized
        );
        let err = "cheapest".parse::<StrategyKind>().unwrap_err();
        assert!(err.to_string().contains("balanced"));
    }
}
