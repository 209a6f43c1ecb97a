//! Microsoft provider tests: token lifecycle and XML responses against a
//! mocked token service and translation endpoint.

use chrono::{Duration, Utc};
use context_translators::{
    ContextAwareTranslator, CredentialStore, ManualClock, MicrosoftTranslator, TranslationError,
    TranslatorConfig,
};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERIALIZATION_NS: &str = "http://schemas.microsoft.com/2003/10/Serialization/";

fn xml_string(escaped_text: &str) -> String {
    format!(r#"<string xmlns="{}">{}</string>"#, SERIALIZATION_NS, escaped_text)
}

fn translator_for(server: &MockServer, clock: Arc<ManualClock>) -> MicrosoftTranslator {
    let store = CredentialStore::from_path("/nonexistent/translators.cfg").without_env();
    let config = TranslatorConfig::new("en", "nl")
        .with_api_key("ms-key")
        .with_endpoint(format!("{}/Translate", server.uri()))
        .with_token_endpoint(format!("{}/issueToken", server.uri()));

    MicrosoftTranslator::with_store(config, &store)
        .expect("translator should build")
        .with_clock(clock)
}

async fn mount_token_service(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/issueToken"))
        .and(header("Ocp-Apim-Subscription-Key", "ms-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("token-abc"))
        .mount(server)
        .await;
}

async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_context_translation_with_token() {
    let server = MockServer::start().await;
    mount_token_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/Translate"))
        .and(header("Authorization", "Bearer token-abc"))
        .and(query_param("text", "He<span>leaves</span>the building"))
        .and(query_param("from", "en"))
        .and(query_param("to", "nl"))
        .and(query_param("contentType", "text/html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(xml_string("Hij&lt;span&gt;verlaat&lt;/span&gt;het gebouw")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock);

    let result = translator
        .translate_with_context("leaves", "He", "the building")
        .await;
    assert_eq!(result.unwrap(), "verlaat");
}

#[tokio::test]
async fn test_context_with_markup_characters_round_trips() {
    let server = MockServer::start().await;
    mount_token_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/Translate"))
        .and(query_param(
            "text",
            "a &lt; b <span>Tom &amp; Jerry</span> &gt; c",
        ))
        .and(query_param("contentType", "text/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml_string(
            "c &amp;gt; &lt;span&gt;Tom &amp;amp; Jerry&lt;/span&gt; a &amp;lt; b",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock);

    let result = translator
        .translate_with_context("Tom & Jerry", "a < b ", " > c")
        .await;
    assert_eq!(result.unwrap(), "Tom & Jerry");
}

#[tokio::test]
async fn test_plain_result_is_unescaped_once() {
    let server = MockServer::start().await;
    mount_token_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/Translate"))
        .and(query_param("contentType", "text/plain"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(xml_string("use &amp;lt; in HTML")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock);

    assert_eq!(
        translator.translate("use &lt; in HTML").await.unwrap(),
        "use &lt; in HTML"
    );
}

#[tokio::test]
async fn test_token_lifecycle() {
    let server = MockServer::start().await;
    mount_token_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/Translate"))
        .and(query_param("contentType", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml_string("hallo")))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock.clone());
    assert!(!translator.session().has_token().await);

    assert_eq!(translator.translate("hello").await.unwrap(), "hallo");
    assert_eq!(
        request_paths(&server).await,
        vec!["/issueToken", "/Translate"]
    );

    clock.advance(Duration::minutes(5));
    translator.translate("hello").await.unwrap();
    assert_eq!(
        request_paths(&server).await,
        vec!["/issueToken", "/Translate", "/Translate"]
    );

    clock.advance(Duration::minutes(3));
    translator.translate("hello").await.unwrap();
    assert_eq!(
        request_paths(&server).await,
        vec![
            "/issueToken",
            "/Translate",
            "/Translate",
            "/issueToken",
            "/Translate"
        ]
    );
}

#[tokio::test]
async fn test_explicit_refresh() {
    let server = MockServer::start().await;
    mount_token_service(&server).await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock.clone());

    translator.refresh_token().await.unwrap();
    let first_expiry = translator.session().expires_at().await.unwrap();

    clock.advance(Duration::minutes(1));
    translator.refresh_token().await.unwrap();

    assert_eq!(
        translator.session().expires_at().await.unwrap(),
        first_expiry + Duration::minutes(1)
    );
    assert_eq!(
        request_paths(&server).await,
        vec!["/issueToken", "/issueToken"]
    );
}

#[tokio::test]
async fn test_invalid_subscription_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/issueToken"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Translate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml_string("never")))
        .expect(0)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock);

    let err = translator
        .translate_with_context("leaves", "He ", " the building")
        .await
        .unwrap_err();

    match err {
        TranslationError::AuthenticationError { message } => {
            assert!(message.contains("invalid subscription key"))
        }
        other => panic!("expected AuthenticationError, got {:?}", other),
    }
    assert!(!translator.session().has_token().await);
}

#[tokio::test]
async fn test_token_service_failure_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/issueToken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock);

    let err = translator.translate("hello").await.unwrap_err();
    assert!(matches!(err, TranslationError::ProviderError { status: 500, .. }));
}

#[tokio::test]
async fn test_rejected_token_is_not_retried() {
    let server = MockServer::start().await;
    mount_token_service(&server).await;

    Mock::given(method("GET"))
        .and(path("/Translate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let translator = translator_for(&server, clock);

    let err = translator.translate("hello").await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(
        request_paths(&server).await,
        vec!["/issueToken", "/Translate"]
    );
}
