//! Routing decision and execution engine
//!
//! ## Module Structure
//!
//! - `complexity` - Prompt complexity estimation
//! - `strategy` - Scoring strategies and their configuration names
//! - `selection` - Constraint filtering and deterministic ranking
//! - `engine` - Routing decisions with configured fallbacks
//! - `execution` - Backoff policy, retry decisions and executor states
//! - `fallback` - Candidate-by-candidate execution with retry

pub mod complexity;
pub mod engine;
pub mod execution;
pub mod fallback;
pub mod selection;
pub mod strategy;


pub use complexity::{ComplexityEstimator, ComplexityFeature, FeatureInput};
pub use engine::RoutingEngine;
pub use execution::{BackoffPolicy, ExecutionState, RetryDecision, Sleeper, TokioSleeper};
pub use fallback::FallbackExecutor;
pub use selection::{ModelSelector, Selection};
pub use strategy::{
    Balanced, CostOptimized, LatencyOptimized, QualityOptimized, RoutingStrategy, StrategyKind,
};
