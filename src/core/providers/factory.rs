//! Provider factory
//!
//! Maps a model identifier to a provider instance. Provider families are
//! registered with a regex over model ids; the first matching registration
//! wins. Instances are cached per model id: the cache holds one
//! `OnceCell` per key, so concurrent first use of the same model constructs
//! exactly one provider while unrelated models never wait on each other.

use dashmap::DashMap;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::ProviderError;
use crate::config::ProviderSettings;
use crate::core::traits::Provider;
use crate::utils::error::{GatewayError, Result};

/// Everything a constructor needs to build a provider for one model
#[derive(Debug, Clone)]
pub struct ProviderSpec {
    /// Model the provider will serve
    pub model_id: String,
    /// Provider key of the matching registration
    pub provider_key: String,
    /// Credentials configured for the provider key
    pub settings: ProviderSettings,
}

/// Builds a provider instance from its spec
pub type ProviderConstructor =
    Arc<dyn Fn(&ProviderSpec) -> std::result::Result<Arc<dyn Provider>, ProviderError> + Send + Sync>;

struct Registration {
    pattern: Regex,
    provider_key: String,
    requires_api_key: bool,
    constructor: ProviderConstructor,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("pattern", &self.pattern.as_str())
            .field("provider_key", &self.provider_key)
            .field("requires_api_key", &self.requires_api_key)
            .finish()
    }
}

/// Model id to provider resolution with a per-model instance cache
#[derive(Debug, Default)]
pub struct ProviderFactory {
    registrations: Vec<Registration>,
    settings: HashMap<String, ProviderSettings>,
    cache: DashMap<String, Arc<OnceCell<Arc<dyn Provider>>>>,
}

impl ProviderFactory {
    /// Create a factory with the given credentials and no registrations
    pub fn new(settings: HashMap<String, ProviderSettings>) -> Self {
        Self {
            registrations: Vec::new(),
            settings,
            cache: DashMap::new(),
        }
    }

    /// Merge credentials into the factory (builder pattern)
    ///
    /// Entries already present for a provider key are replaced.
    pub fn with_settings(mut self, settings: HashMap<String, ProviderSettings>) -> Self {
        self.settings.extend(settings);
        self
    }

    /// Register a provider family
    ///
    /// `pattern` is matched against model ids. When `requires_api_key` is set,
    /// creation fails unless credentials with a key exist for `provider_key`.
    pub fn register<F>(
        &mut self,
        pattern: &str,
        provider_key: impl Into<String>,
        requires_api_key: bool,
        constructor: F,
    ) -> Result<()>
    where
        F: Fn(&ProviderSpec) -> std::result::Result<Arc<dyn Provider>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        let pattern = Regex::new(pattern).map_err(|e| {
            GatewayError::configuration(format!("Invalid model pattern '{}': {}", pattern, e))
        })?;
        let provider_key = provider_key.into();
        debug!("Registered provider family {} for /{}/", provider_key, pattern);

        self.registrations.push(Registration {
            pattern,
            provider_key,
            requires_api_key,
            constructor: Arc::new(constructor),
        });
        Ok(())
    }

    /// Register a provider family (builder pattern)
    pub fn with_provider<F>(
        mut self,
        pattern: &str,
        provider_key: impl Into<String>,
        requires_api_key: bool,
        constructor: F,
    ) -> Result<Self>
    where
        F: Fn(&ProviderSpec) -> std::result::Result<Arc<dyn Provider>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        self.register(pattern, provider_key, requires_api_key, constructor)?;
        Ok(self)
    }

    /// Provider instance for `model_id`, constructing it on first use
    ///
    /// Fails with a configuration error when no registration matches, when
    /// required credentials are missing or when construction fails. Failed
    /// constructions are not cached.
    pub async fn create(&self, model_id: &str) -> Result<Arc<dyn Provider>> {
        if let Some(cell) = self.cache.get(model_id) {
            if let Some(provider) = cell.get() {
                return Ok(Arc::clone(provider));
            }
        }

        // Clone the cell out so the shard lock is released before awaiting
        let cell = {
            let entry = self
                .cache
                .entry(model_id.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()));
            Arc::clone(entry.value())
        };

        let provider = cell
            .get_or_try_init(|| async { self.construct(model_id) })
            .await?;
        Ok(Arc::clone(provider))
    }

    fn construct(&self, model_id: &str) -> Result<Arc<dyn Provider>> {
        let registration = self
            .registrations
            .iter()
            .find(|r| r.pattern.is_match(model_id))
            .ok_or_else(|| {
                GatewayError::configuration(format!(
                    "No provider registered for model '{}'",
                    model_id
                ))
            })?;

        let settings = self
            .settings
            .get(&registration.provider_key)
            .cloned()
            .unwrap_or_default();

        if registration.requires_api_key && !settings.has_api_key() {
            return Err(GatewayError::configuration(format!(
                "Missing API key for provider '{}' (model '{}')",
                registration.provider_key, model_id
            )));
        }

        let spec = ProviderSpec {
            model_id: model_id.to_string(),
            provider_key: registration.provider_key.clone(),
            settings,
        };

        let provider = (registration.constructor)(&spec).map_err(|e| {
            GatewayError::configuration(format!(
                "Failed to construct provider for '{}': {}",
                model_id, e
            ))
        })?;

        info!(
            "Constructed provider {} for model {}",
            registration.provider_key, model_id
        );
        Ok(provider)
    }

    /// Provider keys with a registration, in registration order
    pub fn provider_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for registration in &self.registrations {
            if !keys.contains(&registration.provider_key.as_str()) {
                keys.push(&registration.provider_key);
            }
        }
        keys
    }

    /// Number of models with a constructed provider
    pub fn cached_count(&self) -> usize {
        self.cache
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    /// Drop every cached instance
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
