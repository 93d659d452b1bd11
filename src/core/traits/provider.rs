//! Provider capability
//!
//! Network clients for each backend implement [`Provider`]. The router never
//! talks to a backend directly: it resolves a provider through the
//! [`ProviderFactory`](crate::core::providers::ProviderFactory) and calls
//! [`Provider::complete`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::core::providers::ProviderError;
use crate::core::types::Request;

/// Raw completion returned by a backend
///
/// The executor turns this into a [`Response`](crate::core::types::Response)
/// by attaching the model used and the attempt trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCompletion {
    /// Generated text
    pub content: String,
    /// Cost of this call in currency units
    pub cost: f64,
    /// Latency reported by the backend in milliseconds
    pub latency_ms: u64,
    /// Tokens consumed
    pub tokens: u64,
}

impl ProviderCompletion {
    /// Create a completion
    pub fn new(content: impl Into<String>, cost: f64, latency_ms: u64, tokens: u64) -> Self {
        Self {
            content: content.into(),
            cost,
            latency_ms,
            tokens,
        }
    }
}

/// Unified backend interface
///
/// Implementations must be cheap to share: the factory hands out one
/// `Arc<dyn Provider>` per model id to every concurrent request.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Provider key, such as "openai" or "anthropic"
    fn name(&self) -> &str;

    /// Run one completion
    ///
    /// Failures are classified through [`ProviderError::kind`]; only
    /// transient ones are retried.
    async fn complete(&self, request: &Request) -> Result<ProviderCompletion, ProviderError>;
}
