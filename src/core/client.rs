//! Shared HTTP plumbing for the provider clients

use reqwest::StatusCode;
use tracing::warn;

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};

/// Build the HTTP client for one translator instance
pub fn build_http_client(config: &TranslatorConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| TranslationError::ConfigError {
        message: format!("Failed to create HTTP client: {}", e),
    })
}

/// Send a prepared request and return the body of a successful response
pub async fn send_for_text(provider: &str, request: reqwest::RequestBuilder) -> Result<String> {
    let response = request.send().await.map_err(|e| {
        warn!("{} request failed: {}", provider, e);
        TranslationError::TranslationUnavailable {
            message: e.to_string(),
        }
    })?;

    let status = response.status();

    if status.is_success() {
        return Ok(response.text().await?);
    }

    let error_text = response.text().await.unwrap_or_default();
    warn!("{} returned {}", provider, status);

    Err(classify_failure(status, error_text))
}

/// Map a non-success status to the error taxonomy
pub fn classify_failure(status: StatusCode, error_text: String) -> TranslationError {
    let rejected_key = error_text.contains("API_KEY_INVALID") || error_text.contains("API key not valid");

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || rejected_key {
        return TranslationError::AuthenticationError {
            message: if error_text.is_empty() {
                status.to_string()
            } else {
                error_text
            },
        };
    }

    TranslationError::ProviderError {
        status: status.as_u16(),
        message: error_text,
    }
}
