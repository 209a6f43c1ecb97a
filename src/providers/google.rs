//! Google Translate v2 provider
//!
//! The API key travels in the query string; there is no session state.
//! Responses look like `{"data": {"translations": [{"translatedText": "..."}]}}`.

use async_trait::async_trait;
use serde_json::json;
use std::fmt;
use tracing::{debug, info};

use crate::core::client::{build_http_client, send_for_text};
use crate::core::config::TranslatorConfig;
use crate::core::credentials::{resolve_api_key, CredentialStore};
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ContentType, LanguagePair, Provider};
use crate::core::span;
use crate::core::translator::ContextAwareTranslator;

/// Public Google Translate v2 endpoint
pub const GOOGLE_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Translate translator for one language pair
#[derive(Clone)]
pub struct GoogleTranslator {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
    languages: LanguagePair,
}

impl GoogleTranslator {
    /// Create a translator, reading the key from `TRANSLATE_API_KEY` if the
    /// config does not carry one
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        Self::with_store(config, &CredentialStore::default_location())
    }

    /// Create a translator that falls back to the given credential store
    pub fn with_store(config: TranslatorConfig, store: &CredentialStore) -> Result<Self> {
        config.validate()?;

        let api_key = resolve_api_key(
            config.api_key.as_deref(),
            Provider::Google.key_name(),
            store,
        )?;
        let client = build_http_client(&config)?;
        let languages = config.language_pair();

        info!("Created Google translator for {}", languages);

        Ok(Self {
            api_key,
            client,
            endpoint: config
                .endpoint
                .unwrap_or_else(|| GOOGLE_TRANSLATE_URL.to_string()),
            languages,
        })
    }

    fn format_param(content_type: ContentType) -> &'static str {
        match content_type {
            ContentType::Plain => "text",
            ContentType::Html => "html",
        }
    }
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("languages", &self.languages)
            .finish()
    }
}

#[async_trait]
impl ContextAwareTranslator for GoogleTranslator {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    async fn send_translation_request(&self, text: &str, content_type: ContentType) -> Result<String> {
        let body = json!({
            "q": text,
            "source": self.languages.source(),
            "target": self.languages.target(),
            "format": Self::format_param(content_type),
        });

        debug!(
            "Google request ({}): {} chars",
            content_type,
            text.chars().count()
        );

        let request = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body);

        let response = send_for_text("Google", request).await?;
        let translation = parse_translation(&response)?;

        // translatedText may carry entities even for plain text.
        Ok(match content_type {
            ContentType::Plain => span::unescape(&translation).into_owned(),
            ContentType::Html => translation,
        })
    }
}

/// Pull the first `translatedText` out of a v2 response body
fn parse_translation(body: &str) -> Result<String> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TranslationError::InvalidResponse {
            message: format!("Failed to parse API response: {}", e),
        })?;

    json["data"]["translations"]
        .get(0)
        .and_then(|t| t["translatedText"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| TranslationError::InvalidResponse {
            message: "missing 'data.translations[0].translatedText'".to_string(),
        })
}
