//! The context-aware translation capability shared by all providers

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::errors::Result;
use crate::core::models::{ContentType, LanguagePair, Provider};
use crate::core::span;

/// A translator bound to one language pair and one credential
///
/// Providers implement the raw request; plain and context-aware translation
/// are built on top of it here.
#[async_trait]
pub trait ContextAwareTranslator: Send + Sync {
    /// Which backend this translator talks to
    fn provider(&self) -> Provider;

    /// Fixed for the lifetime of the instance
    fn languages(&self) -> &LanguagePair;

    /// Send one translation request. For [`ContentType::Plain`] the result is
    /// final text with any entities resolved; for [`ContentType::Html`] it is
    /// the provider's markup, untouched.
    ///
    /// Token-based providers make sure a valid token is held first.
    async fn send_translation_request(&self, text: &str, content_type: ContentType) -> Result<String>;

    /// Language the queries are written in
    fn source_language(&self) -> &str {
        self.languages().source()
    }

    /// Language the queries are translated into
    fn target_language(&self) -> &str {
        self.languages().target()
    }

    /// Translate without context
    async fn translate(&self, query: &str) -> Result<String> {
        if query.is_empty() {
            return Ok(String::new());
        }

        self.send_translation_request(query, ContentType::Plain).await
    }

    /// Translate `query` as it appears between `before_context` and
    /// `after_context`, returning only the query's translation.
    ///
    /// Pass `""` for a missing side of the context.
    async fn translate_with_context(
        &self,
        query: &str,
        before_context: &str,
        after_context: &str,
    ) -> Result<String> {
        let marked = span::encode(query, before_context, after_context);
        debug!(
            "{} context translation {}: {} chars",
            self.provider(),
            self.languages(),
            marked.len()
        );

        let markup = self.send_translation_request(&marked, ContentType::Html).await?;

        span::extract_span(&markup, after_context).map_err(|e| {
            warn!("{} returned markup without a usable span: {}", self.provider(), e);
            e.into()
        })
    }
}
