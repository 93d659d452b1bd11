//! Validators for configuration sections

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::types::ModelProfile;
use std::collections::HashSet;
use tracing::debug;

impl Validate for RouterSettings {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating router settings");

        if self.timeout_secs == 0 {
            return Err("Router timeout must be greater than 0".to_string());
        }

        if self.fallback_models.iter().any(|m| m.trim().is_empty()) {
            return Err("Fallback model ids must not be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_delay_ms > self.max_delay_ms {
            return Err(format!(
                "Retry base delay ({}ms) must not exceed max delay ({}ms)",
                self.base_delay_ms, self.max_delay_ms
            ));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(format!(
                "Retry backoff multiplier must be at least 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        Ok(())
    }
}

impl Validate for DefaultConstraints {
    fn validate(&self) -> Result<(), String> {
        self.to_constraints().map(|_| ()).map_err(|e| e.to_string())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level must not be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for [ModelProfile] {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating {} model profiles", self.len());

        let mut seen = HashSet::new();
        for profile in self {
            profile.validate().map_err(|e| e.to_string())?;
            if !seen.insert(profile.model_id.as_str()) {
                return Err(format!("Duplicate model id '{}'", profile.model_id));
            }
        }

        Ok(())
    }
}
