//! Core functionality for the router
//!
//! This module contains the routing and execution logic and the data
//! structures it operates on.

pub mod analytics;
pub mod gateway;
pub mod providers;
pub mod router;
pub mod traits;
pub mod types;

pub use gateway::{CompletionOptions, Gateway};
