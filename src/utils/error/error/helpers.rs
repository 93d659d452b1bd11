//! Helper functions for creating and inspecting errors

use super::types::GatewayError;
use crate::core::types::Attempt;

impl GatewayError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_constraint<S: Into<String>>(message: S) -> Self {
        Self::InvalidConstraint(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    /// Whether the caller may reasonably retry the whole request
    ///
    /// Constraint and eligibility errors mean no viable action exists, so they
    /// are never retryable. An exhausted chain may recover later if any of its
    /// failures was transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AllProvidersFailed { attempts } => attempts
                .iter()
                .any(|a| a.error_kind.is_some_and(|k| k.is_retryable())),
            Self::Provider(err) => err.kind().is_retryable(),
            _ => false,
        }
    }

    /// Attempt trace carried by exhaustion and cancellation errors
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            Self::AllProvidersFailed { attempts } | Self::Cancelled { attempts } => attempts,
            _ => &[],
        }
    }

    /// True for caller-initiated cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
