use std::env;
use std::path::PathBuf;

/// Storage configuration.
///
/// Reads from the `NUTRIGUIDE_DATA_DIR` environment variable, falling back to
/// `$XDG_DATA_HOME/nutriguide` or `~/.local/share/nutriguide` when unset.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one JSON file per slot.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Environment variable overriding the data directory.
    pub const DATA_DIR_ENV: &str = "NUTRIGUIDE_DATA_DIR";

    /// Build a config from the environment.
    ///
    /// Priority: `NUTRIGUIDE_DATA_DIR` env var, then [`Self::default_data_dir`].
    pub fn from_env() -> Self {
        let data_dir = env::var(Self::DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_data_dir());
        Self { data_dir }
    }

    /// Build a config from an explicit directory (useful for tests and CLI flags).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// XDG data layout: `$XDG_DATA_HOME/nutriguide` or `~/.local/share/nutriguide`.
    pub fn default_data_dir() -> PathBuf {
        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("nutriguide");
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local")
            .join("share")
            .join("nutriguide")
    }

    /// Path of the log file written while the dashboard owns the terminal.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("nutriguide.log")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
