//! Provider resolution
//!
//! Concrete network clients live outside this crate. This module holds the
//! error taxonomy they report through and the factory that resolves a model
//! id to a shared instance.

pub mod factory;
pub mod unified_provider;

pub use crate::core::traits::{Provider, ProviderCompletion};
pub use factory::{ProviderConstructor, ProviderFactory, ProviderSpec};
pub use unified_provider::ProviderError;
