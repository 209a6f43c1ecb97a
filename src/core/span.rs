//! Span marking: embed a query in its sentence context and recover its
//! translation from the provider's markup.
//!
//! The query is wrapped in `<span>...</span>` and sent with the context as
//! HTML. Providers keep tags intact but may reorder, drop or rewrite the text
//! around them, so decoding only searches for the markers and never parses
//! the rest of the payload.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::core::errors::SpanParseError;

/// Opening marker written around the query
pub const OPEN_MARKER: &str = "<span>";
/// Closing marker written around the query
pub const CLOSE_MARKER: &str = "</span>";

/// Leading context characters a provider may pull into the span
pub const BLEED_PUNCTUATION: [char; 6] = [',', ';', '\'', '.', '"', '-'];

static OPENING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*span\s*>").expect("valid opening tag pattern")
});

static CLOSING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/\s*span\s*>").expect("valid closing tag pattern")
});

/// Escape `<`, `>` and `&` so caller text can never look like a marker
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Resolve HTML character entities. Unknown entities and bare `&` are kept
/// as they are; everything else around them is still resolved.
pub fn unescape(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Build the marked query: `before<span>query</span>after`, each piece escaped
pub fn encode(query: &str, before_context: &str, after_context: &str) -> String {
    format!(
        "{}{}{}{}{}",
        escape(before_context),
        OPEN_MARKER,
        escape(query),
        CLOSE_MARKER,
        escape(after_context)
    )
}

/// Extract the text between the first opening marker and the nearest
/// closing marker after it, unescaped and trimmed.
pub fn decode(markup: &str) -> Result<String, SpanParseError> {
    let open = OPENING_TAG
        .find(markup)
        .ok_or(SpanParseError::MalformedOpeningTag)?;

    let trail = &markup[open.end()..];
    let close = CLOSING_TAG
        .find(trail)
        .ok_or(SpanParseError::MalformedClosingTag)?;

    let inner = &trail[..close.start()];
    Ok(unescape(inner).trim().to_string())
}

/// Strip a trailing punctuation mark the provider pulled in from the
/// after-context. Only applies when both sides carry the same character.
pub fn trim_punctuation_bleed(span: &str, after_context: &str) -> String {
    let leading = after_context.trim_start().chars().next();

    match leading {
        Some(mark) if BLEED_PUNCTUATION.contains(&mark) && span.ends_with(mark) => {
            span[..span.len() - mark.len_utf8()].trim_end().to_string()
        }
        _ => span.to_string(),
    }
}

/// Decode provider markup and apply the punctuation post-processing
pub fn extract_span(markup: &str, after_context: &str) -> Result<String, SpanParseError> {
    let span = decode(markup)?;
    Ok(trim_punctuation_bleed(&span, after_context))
}
