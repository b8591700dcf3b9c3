//! Standardized error handling for registry HTTP exchanges

use crate::error::RegistryError;
use reqwest::{Response, StatusCode};

/// Turns unexpected registry responses into [`RegistryError::Registry`]
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Consume a response whose status did not match and keep its body verbatim
    /// for the diagnostic.
    pub async fn unexpected_status(response: Response, operation: &'static str) -> RegistryError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());

        Self::handle_registry_error(status, body, operation)
    }

    pub fn handle_registry_error(
        status: StatusCode,
        body: String,
        operation: &'static str,
    ) -> RegistryError {
        RegistryError::Registry {
            operation,
            status: status.as_u16(),
            body,
        }
    }
}

/// Network error categorization and handling
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format network errors with helpful context
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> RegistryError {
        let message = if error.is_timeout() {
            format!("{} timeout: {}", context, error)
        } else if error.is_connect() {
            format!("Connection error during {}: {}", context, error)
        } else if error.to_string().contains("dns") {
            format!("DNS resolution error for {}: {}", context, error)
        } else if error.to_string().contains("certificate") {
            format!("TLS certificate error during {}: {}", context, error)
        } else {
            format!("{} network error: {}", context, error)
        };

        RegistryError::Transport(message)
    }
}
