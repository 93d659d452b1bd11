//! Configuration data models
//!
//! Plain serde structures; every field has a default so partial files load.

#![allow(missing_docs)]

pub mod monitoring;
pub mod provider;
pub mod router;

pub use monitoring::*;
pub use provider::*;
pub use router::*;

/// Default router timeout in seconds
pub fn default_timeout_secs() -> u64 {
    30
}

/// Default attempts per candidate
pub fn default_max_retries() -> u32 {
    3
}

/// Default first backoff delay in milliseconds
pub fn default_base_delay_ms() -> u64 {
    100
}

/// Default backoff ceiling in milliseconds
pub fn default_max_delay_ms() -> u64 {
    30_000
}

/// Default backoff growth factor
pub fn default_backoff_multiplier() -> f64 {
    2.0
}

/// Default log filter
pub fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
