//! Microsoft Translator provider
//!
//! Requests carry a short-lived bearer token obtained from the token service
//! with the subscription key. The translation endpoint answers with an XML
//! document whose text content is the translation.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::client::{build_http_client, send_for_text};
use crate::core::config::TranslatorConfig;
use crate::core::credentials::{resolve_api_key, CredentialStore};
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ContentType, LanguagePair, Provider};
use crate::core::session::{Clock, SessionManager, TokenIssuer};
use crate::core::translator::ContextAwareTranslator;

/// Public token service endpoint
pub const TOKEN_SERVICE_URL: &str = "https://api.cognitive.microsoft.com/sts/v1.0/issueToken";
/// Public translation endpoint (V2 HTTP API)
pub const TRANSLATION_SERVICE_URL: &str = "https://api.microsofttranslator.com/V2/Http.svc/Translate";

/// Exchanges the subscription key for bearer tokens
#[derive(Clone)]
struct TokenService {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
}

#[async_trait]
impl TokenIssuer for TokenService {
    async fn issue_token(&self) -> Result<String> {
        debug!("Requesting Microsoft session token");

        let request = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", self.api_key.as_str())
            .header("Accept", "application/jwt")
            .header("Content-Type", "application/json");

        let token = send_for_text("Microsoft token service", request)
            .await
            .map_err(|e| match e {
                TranslationError::AuthenticationError { .. } => TranslationError::AuthenticationError {
                    message: "Access denied due to invalid subscription key. Make sure to provide a \
                              valid key for an active subscription."
                        .to_string(),
                },
                other => other,
            })?;

        let token = token.trim();
        if token.is_empty() {
            return Err(TranslationError::InvalidResponse {
                message: "token service returned an empty token".to_string(),
            });
        }

        Ok(token.to_string())
    }
}

/// Microsoft Translator translator for one language pair
#[derive(Clone)]
pub struct MicrosoftTranslator {
    client: reqwest::Client,
    endpoint: String,
    languages: LanguagePair,
    tokens: TokenService,
    session: SessionManager,
}

impl MicrosoftTranslator {
    /// Create a translator, reading the key from
    /// `MICROSOFT_TRANSLATE_API_KEY` if the config does not carry one.
    /// No token is requested until the first translation.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        Self::with_store(config, &CredentialStore::default_location())
    }

    /// Create a translator that falls back to the given credential store
    pub fn with_store(config: TranslatorConfig, store: &CredentialStore) -> Result<Self> {
        config.validate()?;

        let api_key = resolve_api_key(
            config.api_key.as_deref(),
            Provider::Microsoft.key_name(),
            store,
        )?;
        let client = build_http_client(&config)?;
        let languages = config.language_pair();
        let session = SessionManager::new(config.token_lease()?);

        info!("Created Microsoft translator for {}", languages);

        Ok(Self {
            tokens: TokenService {
                api_key,
                client: client.clone(),
                endpoint: config
                    .token_endpoint
                    .unwrap_or_else(|| TOKEN_SERVICE_URL.to_string()),
            },
            client,
            endpoint: config
                .endpoint
                .unwrap_or_else(|| TRANSLATION_SERVICE_URL.to_string()),
            languages,
            session,
        })
    }

    /// Replace the clock used for token expiry
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.session = SessionManager::with_clock(self.session.lease(), clock);
        self
    }

    /// Token state of this translator
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Force a new token regardless of the current one's expiry
    pub async fn refresh_token(&self) -> Result<()> {
        self.session.refresh(&self.tokens).await
    }

    fn content_type_param(content_type: ContentType) -> &'static str {
        match content_type {
            ContentType::Plain => "text/plain",
            ContentType::Html => "text/html",
        }
    }
}

impl fmt::Debug for MicrosoftTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrosoftTranslator")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("token_endpoint", &self.tokens.endpoint)
            .field("languages", &self.languages)
            .finish()
    }
}

#[async_trait]
impl ContextAwareTranslator for MicrosoftTranslator {
    fn provider(&self) -> Provider {
        Provider::Microsoft
    }

    fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    async fn send_translation_request(&self, text: &str, content_type: ContentType) -> Result<String> {
        let token = self.session.bearer(&self.tokens).await?;

        debug!(
            "Microsoft request ({}): {} chars",
            content_type,
            text.chars().count()
        );

        let request = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("text", text),
                ("from", self.languages.source()),
                ("to", self.languages.target()),
                ("contentType", Self::content_type_param(content_type)),
            ])
            .header("Accept", "application/xml")
            .header("Authorization", format!("Bearer {}", token));

        // The XML text content is final for plain text and the markup for HTML.
        let response = send_for_text("Microsoft", request).await?;
        xml_text_content(&response)
    }
}

/// Concatenated, unescaped text inside the document's root element
fn xml_text_content(xml: &str) -> Result<String> {
    let invalid = |message: String| TranslationError::InvalidResponse { message };

    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                saw_root = true;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Empty(_)) => saw_root = true,
            Ok(Event::Text(e)) if depth > 0 => {
                let chunk = e
                    .unescape()
                    .map_err(|e| invalid(format!("Bad XML text: {}", e)))?;
                text.push_str(&chunk);
            }
            Ok(Event::CData(e)) if depth > 0 => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(invalid(format!("Failed to parse XML response: {}", e))),
        }
    }

    if !saw_root {
        return Err(invalid("response is not an XML document".to_string()));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_text_content() {
        let xml = r#"<string xmlns="http://schemas.microsoft.com/2003/10/Serialization/">Hallo wereld</string>"#;
        assert_eq!(xml_text_content(xml).unwrap(), "Hallo wereld");
    }

    #[test]
    fn test_xml_text_content_keeps_escaped_markup() {
        let xml = "<?xml version=\"1.0\"?>\n<string>Hij&lt;span&gt;verlaat&lt;/span&gt;het gebouw</string>";
        assert_eq!(
            xml_text_content(xml).unwrap(),
            "Hij<span>verlaat</span>het gebouw"
        );
    }

    #[test]
    fn test_xml_text_content_empty_element() {
        assert_eq!(xml_text_content("<string/>").unwrap(), "");
    }

    #[test]
    fn test_xml_text_content_rejects_plain_text() {
        assert!(matches!(
            xml_text_content("not xml at all"),
            Err(TranslationError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_missing_key_fails_at_construction() {
        let store = CredentialStore::from_path("/nonexistent/translators.cfg").without_env();
        let config = TranslatorConfig::new("en", "nl");

        match MicrosoftTranslator::with_store(config, &store) {
            Err(TranslationError::MissingCredential { name }) => {
                assert_eq!(name, "MICROSOFT_TRANSLATE_API_KEY")
            }
            other => panic!("expected MissingCredential, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_construction_does_not_acquire_token() {
        let store = CredentialStore::from_path("/nonexistent/translators.cfg").without_env();
        let config = TranslatorConfig::new("en", "nl").with_api_key("key");

        let translator = MicrosoftTranslator::with_store(config, &store).unwrap();
        assert!(!translator.session().has_token().await);
        assert_eq!(translator.session().lease(), chrono::Duration::minutes(8));
    }
}
