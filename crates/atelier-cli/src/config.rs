//! CLI configuration.
//!
//! Stored at `~/.config/atelier/config.json`: the API base and origin, the
//! last username, and which backend keeps remembered credentials.
//! `ATELIER_API_BASE` and `ATELIER_ORIGIN` override the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use atelier_core::auth::{FileStore, KeyValueStore, KeyringStore};
use atelier_core::config::{DEFAULT_API_BASE, DEFAULT_ORIGIN};
use atelier_core::ClientConfig;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "atelier";

const CONFIG_FILE: &str = "config.json";
const CREDENTIALS_FILE: &str = "credentials.json";
const SESSION_FILE: &str = "atelier-session.json";

/// Keychain service name for remembered credentials
const KEYRING_SERVICE: &str = "atelier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base: Option<String>,
    pub origin: Option<String>,
    pub last_username: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Client settings: environment first, then this file, then the defaults.
    pub fn client_config(&self) -> ClientConfig {
        self.client_config_with(
            std::env::var("ATELIER_API_BASE").ok(),
            std::env::var("ATELIER_ORIGIN").ok(),
        )
    }

    fn client_config_with(&self, api_base: Option<String>, origin: Option<String>) -> ClientConfig {
        let pick = |env: Option<String>, file: &Option<String>, default: &str| {
            env.or_else(|| file.clone())
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        ClientConfig::new(pick(api_base, &self.api_base, DEFAULT_API_BASE))
            .with_origin(pick(origin, &self.origin, DEFAULT_ORIGIN))
    }

    /// The persistent and session storage areas, in that order.
    pub fn storage_areas(&self) -> Result<(Arc<dyn KeyValueStore>, Arc<dyn KeyValueStore>)> {
        let persistent: Arc<dyn KeyValueStore> = match self.storage {
            StorageBackend::File => Arc::new(FileStore::new(Self::credentials_path()?)),
            StorageBackend::Keyring => Arc::new(KeyringStore::new(KEYRING_SERVICE)),
        };
        let session: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(Self::session_path()));
        Ok((persistent, session))
    }

    fn credentials_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(CREDENTIALS_FILE))
    }

    /// Cleared with the login session or the machine's temp directory.
    fn session_path() -> PathBuf {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(SESSION_FILE)
    }
}
