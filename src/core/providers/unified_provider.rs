//! Unified provider error handling
//!
//! Single error type returned by every [`Provider`](super::Provider).
//!
//! | Variant | HTTP Status | Kind |
//! |------|------------|--------|
//! | Authentication | 401 | Permanent |
//! | RateLimit | 429 | Transient |
//! | ModelNotFound | 404 | Permanent |
//! | InvalidRequest | 400 | Permanent |
//! | ContentFiltered | 400 | Permanent |
//! | Network | - | Transient |
//! | Timeout | 408 | Transient |
//! | ProviderUnavailable | 503 | Transient |
//! | ApiError | any | by status |
//! | Configuration | - | Configuration |
//! | Other | - | Permanent |
//!
//! The fallback executor only looks at [`ProviderError::kind`]: transient
//! failures are retried against the same candidate, everything else advances
//! to the next candidate immediately.

use crate::core::types::FailureKind;

/// Unified provider error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication { provider: String, message: String },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: String,
        message: String,
        /// Seconds the provider asked us to wait, if it said
        retry_after: Option<u64>,
    },

    #[error("Model '{model}' not found for {provider}")]
    ModelNotFound { provider: String, model: String },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest { provider: String, message: String },

    #[error("Content filtered by {provider} safety systems: {reason}")]
    ContentFiltered { provider: String, reason: String },

    #[error("Network error for {provider}: {message}")]
    Network { provider: String, message: String },

    #[error("Timeout for {provider}: {message}")]
    Timeout { provider: String, message: String },

    #[error("Provider {provider} is unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration { provider: String, message: String },

    #[error("{provider} error: {message}")]
    Other { provider: String, message: String },
}

impl ProviderError {
    /// Create authentication error
    pub fn authentication(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(provider: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider: provider.into(),
            message: match retry_after {
                Some(seconds) => format!("Rate limit exceeded. Retry after {} seconds", seconds),
                None => "Rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    /// Create model not found error
    pub fn model_not_found(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create timeout error
    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create provider unavailable error
    pub fn provider_unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create API error from an HTTP status
    pub fn api_error(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create configuration error
    pub fn configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Provider key the error came from
    pub fn provider(&self) -> &str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::ModelNotFound { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::ContentFiltered { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::Configuration { provider, .. }
            | Self::Other { provider, .. } => provider,
        }
    }

    /// Transient/permanent classification driving retry decisions
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RateLimit { .. }
            | Self::Network { .. }
            | Self::Timeout { .. }
            | Self::ProviderUnavailable { .. } => FailureKind::Transient,

            Self::ApiError { status, .. } => match *status {
                408 | 429 => FailureKind::Transient,
                500..=599 => FailureKind::Transient,
                _ => FailureKind::Permanent,
            },

            Self::Configuration { .. } => FailureKind::Configuration,

            Self::Authentication { .. }
            | Self::ModelNotFound { .. }
            | Self::InvalidRequest { .. }
            | Self::ContentFiltered { .. }
            | Self::Other { .. } => FailureKind::Permanent,
        }
    }

    /// Shorthand for `kind().is_retryable()`
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Delay the provider asked for, if any
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
