//! Configuration management

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::LanguagePair;

/// Default token lease: tokens are refreshed after 8 minutes
pub const DEFAULT_TOKEN_LEASE_SECS: u64 = 60 * 8;

/// Longest accepted token lease (one day)
pub const MAX_TOKEN_LEASE_SECS: u64 = 60 * 60 * 24;

/// Configuration for one translator instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Language code the queries are written in
    pub source_language: String,
    /// Language code to translate into
    pub target_language: String,
    /// Falls back to the environment and the config file when absent
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Overrides the provider's translation endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Overrides the provider's token endpoint (token-based providers only)
    #[serde(default)]
    pub token_endpoint: Option<String>,
    /// Lifetime of an acquired session token, in seconds
    #[serde(default = "default_token_lease_secs")]
    pub token_lease_secs: u64,
    /// No timeout is configured unless set
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_token_lease_secs() -> u64 {
    DEFAULT_TOKEN_LEASE_SECS
}

impl TranslatorConfig {
    /// Create a configuration for a language pair with provider defaults
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            api_key: None,
            endpoint: None,
            token_endpoint: None,
            token_lease_secs: DEFAULT_TOKEN_LEASE_SECS,
            timeout_ms: None,
        }
    }

    /// Use this key instead of looking one up
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Send translation requests to another URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Request tokens from another URL
    pub fn with_token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(token_endpoint.into());
        self
    }

    /// Set the token lease in seconds
    pub fn with_token_lease_secs(mut self, secs: u64) -> Self {
        self.token_lease_secs = secs;
        self
    }

    /// Set a request timeout in milliseconds
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: "source_language is required".to_string(),
            });
        }

        if self.target_language.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: "target_language is required".to_string(),
            });
        }

        if self.token_lease_secs == 0 || self.token_lease_secs > MAX_TOKEN_LEASE_SECS {
            return Err(TranslationError::ConfigError {
                message: format!(
                    "token_lease_secs must be between 1 and {}",
                    MAX_TOKEN_LEASE_SECS
                ),
            });
        }

        if matches!(self.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
            return Err(TranslationError::ConfigError {
                message: "api_key cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Trimmed language pair
    pub fn language_pair(&self) -> LanguagePair {
        LanguagePair::new(self.source_language.trim(), self.target_language.trim())
    }

    /// Token lease as a duration
    pub fn token_lease(&self) -> Result<chrono::Duration> {
        i64::try_from(self.token_lease_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| TranslationError::ConfigError {
                message: format!("token_lease_secs out of range: {}", self.token_lease_secs),
            })
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
