//! Translation backends

pub mod google;
pub mod microsoft;

use crate::core::config::TranslatorConfig;
use crate::core::credentials::CredentialStore;
use crate::core::errors::Result;
use crate::core::models::Provider;
use crate::core::translator::ContextAwareTranslator;

pub use google::GoogleTranslator;
pub use microsoft::MicrosoftTranslator;

/// Build a translator for `provider`, resolving the key from the default store
pub fn build_translator(
    provider: Provider,
    config: TranslatorConfig,
) -> Result<Box<dyn ContextAwareTranslator>> {
    build_translator_with_store(provider, config, &CredentialStore::default_location())
}

/// Build a translator for `provider` with an explicit credential store
pub fn build_translator_with_store(
    provider: Provider,
    config: TranslatorConfig,
    store: &CredentialStore,
) -> Result<Box<dyn ContextAwareTranslator>> {
    Ok(match provider {
        Provider::Google => Box::new(GoogleTranslator::with_store(config, store)?),
        Provider::Microsoft => Box::new(MicrosoftTranslator::with_store(config, store)?),
    })
}
