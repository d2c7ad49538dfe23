//! Configuration file management for nutriguide.
//!
//! Provides a TOML-based config file at `~/.config/nutriguide/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use nutriguide_core::generate::Generator;
use nutriguide_core::provider::GeminiClient;
use nutriguide_core::provider::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use nutriguide_store::config::StoreConfig;
use nutriguide_store::{FileStore, Slots};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "NUTRIGUIDE_MODEL";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the nutriguide config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/nutriguide` or
/// `~/.config/nutriguide`, never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("nutriguide");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("nutriguide")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix: the file may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line. Each wins over env and file.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct NutriConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub store: StoreConfig,
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl NutriConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `--api-key` > `GEMINI_API_KEY` > `gemini.api_key` > none
    /// - Model: `--model` > `NUTRIGUIDE_MODEL` > `gemini.model` > [`DEFAULT_MODEL`]
    /// - Base URL: `gemini.base_url` > [`DEFAULT_BASE_URL`]
    /// - Data dir: `--data-dir` > `NUTRIGUIDE_DATA_DIR` > `storage.data_dir` > XDG data dir
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let path = config_path();
        let file = if path.exists() {
            load_config()?
        } else {
            ConfigFile::default()
        };

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| non_empty_env(API_KEY_ENV))
            .or(file.gemini.api_key);

        let model = cli
            .model
            .clone()
            .or_else(|| non_empty_env(MODEL_ENV))
            .or(file.gemini.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = file
            .gemini
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| non_empty_env(StoreConfig::DATA_DIR_ENV).map(PathBuf::from))
            .or(file.storage.data_dir)
            .unwrap_or_else(StoreConfig::default_data_dir);

        Ok(Self {
            api_key,
            model,
            base_url,
            store: StoreConfig::new(data_dir),
        })
    }

    /// Open the file store and wrap it in typed slots.
    pub fn slots(&self) -> Result<Slots> {
        let store = FileStore::open(&self.store).with_context(|| {
            format!("failed to open data directory {}", self.store.data_dir.display())
        })?;
        Ok(Slots::new(Arc::new(store)))
    }

    /// Build a generator backed by the Gemini API.
    pub fn generator(&self) -> Result<Generator> {
        let client = GeminiClient::new(self.api_key.clone().unwrap_or_default())
            .with_context(|| {
                format!("set {API_KEY_ENV} or run `nutriguide init --api-key <KEY>`")
            })?
            .with_model(&self.model)
            .with_base_url(&self.base_url);
        tracing::debug!(model = client.model(), "using Gemini generation service");
        Ok(Generator::new(Arc::new(client)))
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
