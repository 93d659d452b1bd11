//! Configuration management for the router
//!
//! This module handles loading, validation and access to the fully-resolved
//! configuration consumed by the gateway.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::types::{Constraints, ModelProfile, ModelRegistry};
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry contents
    #[serde(default)]
    pub models: Vec<ModelProfile>,
    #[serde(default)]
    pub router: RouterSettings,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Per-request constraints applied to axes the caller leaves unset
    #[serde(default)]
    pub defaults: DefaultConstraints,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Credentials keyed by provider key
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML (`.yaml`, `.yml`) or JSON (`.json`) file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            GatewayError::configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: Self = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                GatewayError::configuration(format!("Failed to parse config: {}", e))
            })?,
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                GatewayError::configuration(format!("Failed to parse config: {}", e))
            })?,
            _ => {
                return Err(GatewayError::configuration(format!(
                    "Unsupported config file format: {:?}",
                    path
                )));
            }
        };

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.models
            .as_slice()
            .validate()
            .map_err(|e| GatewayError::configuration(format!("Model config error: {}", e)))?;

        self.router
            .validate()
            .map_err(|e| GatewayError::configuration(format!("Router config error: {}", e)))?;

        self.retry
            .validate()
            .map_err(|e| GatewayError::configuration(format!("Retry config error: {}", e)))?;

        self.defaults.validate().map_err(|e| {
            GatewayError::configuration(format!("Default constraints error: {}", e))
        })?;

        self.logging
            .validate()
            .map_err(|e| GatewayError::configuration(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Registry built from the configured models
    pub fn registry(&self) -> Result<ModelRegistry> {
        ModelRegistry::from_profiles(self.models.iter().cloned())
    }

    /// Default per-request constraints
    pub fn default_constraints(&self) -> Result<Constraints> {
        self.defaults.to_constraints()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
