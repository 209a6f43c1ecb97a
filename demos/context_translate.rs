//! Translate one word in its sentence with a real provider.
//!
//! Usage: cargo run --example context_translate -- [google|microsoft] <before> <query> <after>
//!
//! Keys come from TRANSLATE_API_KEY / MICROSOFT_TRANSLATE_API_KEY in the
//! environment, `.env`, or ~/.config/translators.cfg.

use context_translators::{build_translator, Provider, TranslatorConfig};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "context_translators=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let provider: Provider = args.next().unwrap_or_else(|| "google".to_string()).parse()?;
    let before = args.next().unwrap_or_else(|| "He ".to_string());
    let query = args.next().unwrap_or_else(|| "leaves".to_string());
    let after = args.next().unwrap_or_else(|| " the building".to_string());

    let source = std::env::var("SOURCE_LANG").unwrap_or_else(|_| "en".to_string());
    let target = std::env::var("TARGET_LANG").unwrap_or_else(|_| "nl".to_string());

    // One instance per language pair, reused for every call.
    let translator = build_translator(provider, TranslatorConfig::new(source, target))?;

    println!("=== {} ({}) ===", translator.provider(), translator.languages());
    println!("plain:   {}", translator.translate(&query).await?);
    println!(
        "context: {}",
        translator.translate_with_context(&query, &before, &after).await?
    );

    Ok(())
}
