//! Core traits module
//!
//! Capabilities implemented outside the routing core: backend providers and
//! cross-cutting middleware.

pub mod middleware;
pub mod provider;

pub use middleware::*;
pub use provider::*;
