//! Common test utilities for model-router
//!
//! - Registry, request and configuration fixtures
//! - Scripted providers that replay a fixed sequence of outcomes
//! - Custom assertions and helpers
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{fixtures, providers};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let registry = fixtures::standard_registry();
//!     let backend = providers::ScriptedProvider::succeeding("gpt-4o-mini");
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod providers;

// Re-export commonly used items
pub use fixtures::{RequestFactory, standard_config, standard_profiles, standard_registry};
pub use providers::{RecordingSleeper, ScriptedProvider, scripted_factory};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err and return the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
