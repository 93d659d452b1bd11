//! Error types for the router

use crate::core::providers::ProviderError;
use crate::core::types::{Attempt, Constraints};
use thiserror::Error;

/// Result type alias for the router
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the router
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Malformed constraint values; never enters routing
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

    /// No model survived hard-constraint filtering
    #[error(
        "No eligible model for constraints ({}); candidates: [{}]",
        .constraints,
        .candidates.join(", ")
    )]
    NoEligibleModel {
        /// Constraints that rejected every candidate
        constraints: Constraints,
        /// Every model id that was considered
        candidates: Vec<String>,
    },

    /// Configuration errors, including providers that cannot be constructed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A single provider failure surfaced outside the fallback loop
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    /// Every candidate in the fallback chain failed
    #[error("All providers failed after {} attempts", .attempts.len())]
    AllProvidersFailed {
        /// Full attempt trace
        attempts: Vec<Attempt>,
    },

    /// The caller cancelled the request or its deadline expired
    #[error("Request cancelled after {} attempts", .attempts.len())]
    Cancelled {
        /// Attempts completed before cancellation
        attempts: Vec<Attempt>,
    },

    /// Request rejected by validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Usage store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
