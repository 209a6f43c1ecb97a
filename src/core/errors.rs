//! Custom error types for translation operations

use thiserror::Error;

/// Failure to locate the translated span inside provider markup
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanParseError {
    /// No `<span>` marker anywhere in the markup
    #[error("no opening span tag found")]
    MalformedOpeningTag,

    /// An opening marker without a `</span>` after it
    #[error("no closing span tag found")]
    MalformedClosingTag,
}

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// No API key from the constructor, the environment or the config file
    #[error("Missing credential: {name}. Create the config file or pass the key explicitly")]
    MissingCredential {
        /// Name of the configuration entry that was looked up
        name: String,
    },

    /// The provider rejected the key or the bearer token
    #[error("Authentication failed: {message}")]
    AuthenticationError {
        /// Provider-supplied detail
        message: String,
    },

    /// Any other non-success provider response
    #[error("Provider error: {status} - {message}")]
    ProviderError {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        message: String,
    },

    /// Network-level failure before a response was received
    #[error("Translation unavailable: {message}")]
    TranslationUnavailable {
        /// Underlying transport error
        message: String,
    },

    /// The provider answered but the translated span could not be extracted
    #[error("Failed to parse spanned string: {0}")]
    SpanParse(#[from] SpanParseError),

    /// Success status with a body in an unexpected shape
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was missing or malformed
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What is wrong with the configuration
        message: String,
    },
}

impl TranslationError {
    /// True for failures caused by credentials rather than by the request
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            TranslationError::AuthenticationError { .. } | TranslationError::MissingCredential { .. }
        )
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        TranslationError::TranslationUnavailable {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for TranslationError {
    fn from(err: config::ConfigError) -> Self {
        TranslationError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
