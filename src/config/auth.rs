//! API-key authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Boundary authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared API key expected in the `x-api-key` header
    pub api_key: Secret<String>,
}

impl AuthConfig {
    /// Validate auth configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__API_KEY"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_key_validates() {
        let config = AuthConfig {
            api_key: Secret::new("some-key".to_string()),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_key_fails_validation() {
        let config = AuthConfig {
            api_key: Secret::new(String::new()),
        };
        assert!(config.validate().is_err());
    }
}
