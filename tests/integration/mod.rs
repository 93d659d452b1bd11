//! Integration tests for model-router
//!
//! These tests drive the public API across component boundaries with
//! scripted providers standing in for network backends.

pub mod config_tests;
pub mod fallback_tests;
pub mod gateway_tests;
