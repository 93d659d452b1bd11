//! Environment variable loading
//!
//! `Config::from_env` reads the process environment; tests and embedders can
//! supply any lookup function through `Config::from_lookup`.

use super::Config;
use super::models::ProviderSettings;
use crate::core::router::StrategyKind;
use crate::utils::error::{GatewayError, Result};
use std::str::FromStr;
use tracing::debug;

/// Provider keys and the variables holding their API keys
pub const PROVIDER_KEY_VARS: [(&str, &str); 3] = [
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("google", "GOOGLE_API_KEY"),
];

impl Config {
    /// Build a configuration from defaults overlaid with `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Loading configuration from environment variables");

        let mut config = Self::default();

        if let Some(strategy) = lookup("ROUTER_DEFAULT_STRATEGY") {
            config.router.default_strategy = StrategyKind::from_str(&strategy)?;
        }
        if let Some(models) = lookup("ROUTER_FALLBACK_MODELS") {
            config.router.fallback_models = parse_list(&models);
        }
        if let Some(retries) = lookup("ROUTER_MAX_RETRIES") {
            config.retry.max_retries = parse_number("ROUTER_MAX_RETRIES", &retries)?;
        }
        if let Some(timeout) = lookup("ROUTER_TIMEOUT_SECONDS") {
            config.router.timeout_secs = parse_number("ROUTER_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Some(enabled) = lookup("ROUTER_ENABLE_ANALYTICS") {
            config.analytics.enabled = parse_bool("ROUTER_ENABLE_ANALYTICS", &enabled)?;
        }
        if let Some(level) = lookup("ROUTER_LOG_LEVEL") {
            config.logging.level = level;
        }

        for (provider, var) in PROVIDER_KEY_VARS {
            if let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) {
                config
                    .providers
                    .insert(provider.to_string(), ProviderSettings::with_api_key(key));
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: FromStr>(var: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| GatewayError::configuration(format!("Invalid {}: {}", var, e)))
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GatewayError::configuration(format!(
            "Invalid {}: expected a boolean, got '{}'",
            var, other
        ))),
    }
}
