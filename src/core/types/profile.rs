//! Model catalog
//!
//! [`ModelProfile`] describes one routable model. [`ModelRegistry`] is the
//! catalog the router selects from: it is built and updated during
//! configuration and only read while routing.

use super::constraints::Constraints;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_active() -> bool {
    true
}

/// Cost, latency and quality characteristics of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Unique model identifier, e.g. `gpt-4o`
    pub model_id: String,
    /// Provider key used to look up credentials, e.g. `openai`
    pub provider: String,
    /// Estimated cost per request in currency units
    pub cost_per_request: f64,
    /// Expected latency in milliseconds
    pub latency_ms: u64,
    /// Static quality score in [0, 1]
    pub quality: f64,
    /// Inactive models are never selected
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ModelProfile {
    /// Create an active profile
    pub fn new(
        model_id: impl Into<String>,
        provider: impl Into<String>,
        cost_per_request: f64,
        latency_ms: u64,
        quality: f64,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            provider: provider.into(),
            cost_per_request,
            latency_ms,
            quality,
            active: true,
        }
    }

    /// Mark the profile inactive (builder pattern)
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Check field ranges
    pub fn validate(&self) -> Result<()> {
        if self.model_id.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "model_id must not be empty".to_string(),
            ));
        }
        if self.provider.trim().is_empty() {
            return Err(GatewayError::Configuration(format!(
                "model '{}' has an empty provider key",
                self.model_id
            )));
        }
        if !self.cost_per_request.is_finite() || self.cost_per_request < 0.0 {
            return Err(GatewayError::Configuration(format!(
                "model '{}' has invalid cost {}",
                self.model_id, self.cost_per_request
            )));
        }
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(GatewayError::Configuration(format!(
                "model '{}' has quality {} outside [0, 1]",
                self.model_id, self.quality
            )));
        }
        Ok(())
    }

    /// Whether this profile passes every hard constraint
    ///
    /// Inactive profiles never pass.
    pub fn satisfies(&self, constraints: &Constraints) -> bool {
        if !self.active {
            return false;
        }
        if let Some(max_cost) = constraints.max_cost() {
            if self.cost_per_request > max_cost {
                return false;
            }
        }
        if let Some(max_latency) = constraints.max_latency_ms() {
            if self.latency_ms > max_latency {
                return false;
            }
        }
        if let Some(min_quality) = constraints.min_quality() {
            if self.quality < min_quality {
                return false;
            }
        }
        true
    }
}

/// Min/max of cost and latency across the whole registry
///
/// Used to normalise scores so they stay comparable whatever subset of the
/// registry survives filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistryBounds {
    /// Lowest cost in the registry
    pub min_cost: f64,
    /// Highest cost in the registry
    pub max_cost: f64,
    /// Lowest expected latency in the registry
    pub min_latency_ms: f64,
    /// Highest expected latency in the registry
    pub max_latency_ms: f64,
}

impl RegistryBounds {
    /// Map a cost into [0, 1] relative to the registry range
    pub fn normalize_cost(&self, cost: f64) -> f64 {
        normalize(cost, self.min_cost, self.max_cost)
    }

    /// Map a latency into [0, 1] relative to the registry range
    pub fn normalize_latency(&self, latency_ms: f64) -> f64 {
        normalize(latency_ms, self.min_latency_ms, self.max_latency_ms)
    }
}

impl Default for RegistryBounds {
    fn default() -> Self {
        Self {
            min_cost: 0.0,
            max_cost: 0.0,
            min_latency_ms: 0.0,
            max_latency_ms: 0.0,
        }
    }
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= f64::EPSILON {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Catalog of routable models, in registration order
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    profiles: Vec<ModelProfile>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from profiles, validating each one
    pub fn from_profiles(profiles: impl IntoIterator<Item = ModelProfile>) -> Result<Self> {
        let mut registry = Self::new();
        for profile in profiles {
            registry.register(profile)?;
        }
        Ok(registry)
    }

    /// Add a profile, or replace the one with the same model id
    pub fn register(&mut self, profile: ModelProfile) -> Result<()> {
        profile.validate()?;
        match self.index.get(&profile.model_id) {
            Some(&position) => self.profiles[position] = profile,
            None => {
                self.index
                    .insert(profile.model_id.clone(), self.profiles.len());
                self.profiles.push(profile);
            }
        }
        Ok(())
    }

    /// Toggle a model's active flag
    pub fn set_active(&mut self, model_id: &str, active: bool) -> Result<()> {
        let position = self.index.get(model_id).copied().ok_or_else(|| {
            GatewayError::Configuration(format!("unknown model '{}'", model_id))
        })?;
        self.profiles[position].active = active;
        Ok(())
    }

    /// Look up a profile by model id
    pub fn get(&self, model_id: &str) -> Option<&ModelProfile> {
        self.index.get(model_id).map(|&i| &self.profiles[i])
    }

    /// All profiles in registration order
    pub fn profiles(&self) -> &[ModelProfile] {
        &self.profiles
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Distinct provider keys referenced by the catalog
    pub fn provider_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.profiles.iter().map(|p| p.provider.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Cost and latency range over every registered profile
    pub fn bounds(&self) -> RegistryBounds {
        let mut iter = self.profiles.iter();
        let Some(first) = iter.next() else {
            return RegistryBounds::default();
        };

        let initial = RegistryBounds {
            min_cost: first.cost_per_request,
            max_cost: first.cost_per_request,
            min_latency_ms: first.latency_ms as f64,
            max_latency_ms: first.latency_ms as f64,
        };

        iter.fold(initial, |acc, p| RegistryBounds {
            min_cost: acc.min_cost.min(p.cost_per_request),
            max_cost: acc.max_cost.max(p.cost_per_request),
            min_latency_ms: acc.min_latency_ms.min(p.latency_ms as f64),
            max_latency_ms: acc.max_latency_ms.max(p.latency_ms as f64),
        })
    }
}
