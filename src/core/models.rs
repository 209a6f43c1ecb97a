//! Core data models for translation

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::TranslationError;

/// How the provider should treat the submitted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// Plain text, no markup handling
    Plain,
    /// HTML; tags are kept and entities are engaged on the provider side
    Html,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Plain => write!(f, "plain"),
            ContentType::Html => write!(f, "marked-html"),
        }
    }
}

/// Supported translation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Translate v2, API key in the query string
    Google,
    /// Microsoft Translator, short-lived bearer tokens
    Microsoft,
}

impl Provider {
    /// Name of the configuration entry holding this provider's API key
    pub fn key_name(&self) -> &'static str {
        match self {
            Provider::Google => "TRANSLATE_API_KEY",
            Provider::Microsoft => "MICROSOFT_TRANSLATE_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Google => write!(f, "google"),
            Provider::Microsoft => write!(f, "microsoft"),
        }
    }
}

impl FromStr for Provider {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "microsoft" => Ok(Provider::Microsoft),
            other => Err(TranslationError::ConfigError {
                message: format!("Unknown provider: {}", other),
            }),
        }
    }
}

/// Source and target language of a translator instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    source: String,
    target: String,
}

impl LanguagePair {
    /// Pair two language codes
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Language the queries are written in
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Language the queries are translated into
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// Opaque bearer token with its local expiry
#[derive(Clone)]
pub struct SessionToken {
    /// Bearer value sent in the `Authorization` header
    pub token: String,
    /// First instant at which the token counts as expired
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Token issued at `issued_at`, valid for `lease`
    pub fn new(token: String, issued_at: DateTime<Utc>, lease: Duration) -> Self {
        Self {
            token,
            expires_at: issued_at + lease,
        }
    }

    /// Expired tokens must never be sent
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
