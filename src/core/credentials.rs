//! API key lookup from the environment and the local config file

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::errors::{Result, TranslationError};

/// Location of the key file, relative to the home directory
pub const CONFIG_FILE_PATH: &str = ".config/translators.cfg";

/// Source of long-lived provider API keys
///
/// Lookup order is the process environment (after loading `.env`), then the
/// INI-style key file. Key names in the file match case-insensitively.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: Option<PathBuf>,
    use_env: bool,
}

impl CredentialStore {
    /// Store backed by `~/.config/translators.cfg`
    pub fn default_location() -> Self {
        dotenvy::dotenv().ok();

        Self {
            path: dirs::home_dir().map(|home| home.join(CONFIG_FILE_PATH)),
            use_env: true,
        }
    }

    /// Store backed by an explicit key file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            use_env: true,
        }
    }

    /// Ignore the process environment
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Key file consulted after the environment, if a home directory was found
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Look up a key by name
    pub fn get(&self, name: &str) -> Result<String> {
        if self.use_env {
            if let Ok(value) = std::env::var(name) {
                if !value.trim().is_empty() {
                    debug!("Using {} from environment", name);
                    return Ok(value.trim().to_string());
                }
            }
        }

        let entries = self.read_file()?;
        let value = entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty());

        match value {
            Some(value) => {
                debug!("Using {} from config file", name);
                Ok(value.to_string())
            }
            None => Err(TranslationError::MissingCredential {
                name: name.to_string(),
            }),
        }
    }

    fn read_file(&self) -> Result<HashMap<String, String>> {
        let Some(path) = &self.path else {
            return Ok(HashMap::new());
        };

        let settings = config::Config::builder()
            .add_source(
                config::File::new(&path.to_string_lossy(), config::FileFormat::Ini)
                    .required(false),
            )
            .build()?;

        // Sectioned entries are not keys; only top-level strings count.
        let raw: HashMap<String, config::Value> = settings.try_deserialize()?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| value.into_string().ok().map(|v| (key, v)))
            .collect())
    }
}

/// Read a named key from the environment or `~/.config/translators.cfg`
pub fn get_key_from_config(name: &str) -> Result<String> {
    CredentialStore::default_location().get(name)
}

/// Pick the explicit key if given, otherwise consult the store
pub fn resolve_api_key(explicit: Option<&str>, name: &str, store: &CredentialStore) -> Result<String> {
    match explicit.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => store.get(name),
    }
}
