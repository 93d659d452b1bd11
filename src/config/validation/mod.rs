//! Configuration validation
//!
//! - `trait_def`: the [`Validate`] trait
//! - `validators`: implementations for router, retry and model settings
//! - `tests`: validator test suite

mod trait_def;
mod validators;

pub use trait_def::Validate;
