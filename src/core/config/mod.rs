//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first hit wins:
//! 1. `$GITGUM_CONFIG` if set (an error if the file is missing)
//! 2. `$XDG_CONFIG_HOME/gitgum/config.toml`
//! 3. `~/.gitgum/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use gitgum::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("picker: {}", config.fzf());
//! println!("protected: {:?}", config.protected_branches());
//! ```

pub mod schema;

pub use schema::GlobalConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use schema::{DEFAULT_FZF, DEFAULT_HEIGHT, DEFAULT_MAX_DISPLAY, DEFAULT_STREAM_DELAY_MS};

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub global: GlobalConfig,
    /// Path the configuration was read from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated, or if `$GITGUM_CONFIG` names a missing file. A missing
    /// default file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the config file to read: `$GITGUM_CONFIG` as given, else the
    /// first existing default location.
    fn locate() -> Option<PathBuf> {
        // An explicit path is used even when missing, so the read fails.
        if let Some(path) = std::env::var_os("GITGUM_CONFIG").filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitgum/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".gitgum/config.toml"))
            .filter(|path| path.exists())
    }

    /// Path the configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Fuzzy-selector binary.
    pub fn fzf(&self) -> &str {
        self.global
            .picker
            .as_ref()
            .and_then(|p| p.fzf.as_deref())
            .unwrap_or(DEFAULT_FZF)
    }

    /// Picker height for fzf.
    pub fn picker_height(&self) -> &str {
        self.global
            .picker
            .as_ref()
            .and_then(|p| p.height.as_deref())
            .unwrap_or(DEFAULT_HEIGHT)
    }

    /// Pacing delay between enumerator appends.
    pub fn stream_delay(&self) -> Duration {
        let ms = self
            .global
            .picker
            .as_ref()
            .and_then(|p| p.stream_delay_ms)
            .unwrap_or(DEFAULT_STREAM_DELAY_MS);
        Duration::from_millis(ms)
    }

    /// Number of affected files `clean` lists before summarising.
    pub fn clean_max_display(&self) -> usize {
        self.global
            .clean
            .as_ref()
            .and_then(|c| c.max_display)
            .unwrap_or(DEFAULT_MAX_DISPLAY)
    }

    /// Branches that need an extra confirmation before deletion.
    pub fn protected_branches(&self) -> Vec<String> {
        self.global
            .delete
            .as_ref()
            .and_then(|d| d.protected.clone())
            .unwrap_or_else(|| vec!["main".to_string(), "master".to_string()])
    }
}
