//! Type conversions for GatewayError

use super::types::GatewayError;
use crate::core::providers::ProviderError;

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Configuration { provider, message } => {
                GatewayError::Configuration(format!("{}: {}", provider, message))
            }
            other => GatewayError::Provider(other),
        }
    }
}
