//! Core data model shared by routing, execution and analytics

pub mod constraints;
pub mod decision;
pub mod profile;
pub mod request;
pub mod response;

pub use constraints::Constraints;
pub use decision::{RoutingDecision, ScoredCandidate};
pub use profile::{ModelProfile, ModelRegistry, RegistryBounds};
pub use request::{FORCE_MODEL_KEY, Message, MessageRole, REQUEST_ID_KEY, Request};
pub use response::{Attempt, AttemptOutcome, FailureKind, Response};
