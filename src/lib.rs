//! Context-aware translation over third-party machine translation APIs
//!
//! A short query is embedded in its surrounding sentence, sent to the
//! provider as HTML with the query wrapped in a `<span>` marker, and the
//! translated span is recovered from the provider's markup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;
pub mod providers;

// Re-export key types for convenience
pub use crate::core::{
    config::TranslatorConfig,
    credentials::{get_key_from_config, CredentialStore},
    errors::{Result, SpanParseError, TranslationError},
    models::{ContentType, LanguagePair, Provider, SessionToken},
    session::{Clock, ManualClock, SessionManager, SystemClock, TokenIssuer},
    translator::ContextAwareTranslator,
};

pub use crate::providers::{build_translator, GoogleTranslator, MicrosoftTranslator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
