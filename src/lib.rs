//! # model-router
//!
//! Routes completion requests across interchangeable LLM backends by cost,
//! latency and quality, then executes them with per-candidate retry and
//! ordered fallback.
//!
//! ## Features
//!
//! - **Complexity-aware routing**: a feature-based estimator scores each
//!   request; the balanced strategy weights quality more as complexity grows
//! - **Hard constraints**: cost, latency and quality bounds filter candidates
//!   before any scoring
//! - **Deterministic ranking**: identical inputs always produce identical
//!   decisions
//! - **Fallback execution**: transient failures retry with exponential
//!   backoff, permanent failures advance to the next candidate
//! - **Usage analytics**: every attempt is recorded and summarised
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use model_router::{CompletionOptions, Config, Gateway, ProviderFactory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/router.yaml").await?;
//!     model_router::utils::init_logging(&config.logging)?;
//!
//!     // Register provider families before building the gateway
//!     let factory = ProviderFactory::default();
//!     let gateway = Gateway::from_config(&config, factory)?;
//!
//!     let response = gateway
//!         .complete(
//!             "Summarise the borrow checker in one sentence",
//!             CompletionOptions::new().max_cost(0.01),
//!         )
//!         .await?;
//!
//!     println!("{} answered: {}", response.model_used, response.content);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::analytics::{TimeRange, UsageRecord, UsageSummary, UsageTracker};
pub use core::gateway::{CompletionOptions, Gateway};
pub use core::providers::{Provider, ProviderCompletion, ProviderError, ProviderFactory};
pub use core::router::{RoutingEngine, RoutingStrategy, StrategyKind};
pub use core::traits::{Middleware, MiddlewareChain};
pub use core::types::{
    Attempt, Constraints, FailureKind, Message, MessageRole, ModelProfile, ModelRegistry, Request,
    Response, RoutingDecision,
};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
