//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [picker]
//! fzf = "fzf"
//! height = "40%"
//! stream_delay_ms = 3
//!
//! [clean]
//! max_display = 20
//!
//! [delete]
//! protected = ["main", "master"]
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing so a bad file fails loudly at startup
//! instead of half-way through an interactive session.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default fuzzy-selector binary.
pub const DEFAULT_FZF: &str = "fzf";

/// Default picker height passed to fzf.
pub const DEFAULT_HEIGHT: &str = "40%";

/// Default pacing delay between enumerator appends, in milliseconds.
pub const DEFAULT_STREAM_DELAY_MS: u64 = 3;

/// Upper bound for the pacing delay.
pub const MAX_STREAM_DELAY_MS: u64 = 100;

/// Default number of affected files listed by `clean`.
pub const DEFAULT_MAX_DISPLAY: usize = 20;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Picker settings
    pub picker: Option<PickerConfig>,

    /// `clean` settings
    pub clean: Option<CleanConfig>,

    /// `delete` settings
    pub delete: Option<DeleteConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(picker) = &self.picker {
            picker.validate()?;
        }
        if let Some(clean) = &self.clean {
            clean.validate()?;
        }
        if let Some(delete) = &self.delete {
            delete.validate()?;
        }
        Ok(())
    }
}

/// Picker settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// Fuzzy-selector binary name or path
    pub fzf: Option<String>,

    /// Height passed to `fzf --height`, `N` or `N%`
    pub height: Option<String>,

    /// Pacing delay between streamed branch entries
    pub stream_delay_ms: Option<u64>,
}

impl PickerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fzf) = &self.fzf {
            if fzf.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "picker.fzf cannot be empty".into(),
                ));
            }
        }

        if let Some(height) = &self.height {
            let digits = height.strip_suffix('%').unwrap_or(height);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::InvalidValue(format!(
                    "picker.height must be N or N%, got '{}'",
                    height
                )));
            }
        }

        if let Some(delay) = self.stream_delay_ms {
            if delay > MAX_STREAM_DELAY_MS {
                return Err(ConfigError::InvalidValue(format!(
                    "picker.stream_delay_ms must be at most {}, got {}",
                    MAX_STREAM_DELAY_MS, delay
                )));
            }
        }

        Ok(())
    }
}

/// `clean` settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CleanConfig {
    /// Number of affected files listed before summarising
    pub max_display: Option<usize>,
}

impl CleanConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_display == Some(0) {
            return Err(ConfigError::InvalidValue(
                "clean.max_display must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// `delete` settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DeleteConfig {
    /// Branches that need an extra confirmation before deletion
    pub protected: Option<Vec<String>>,
}

impl DeleteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(protected) = &self.protected {
            if protected.iter().any(|name| name.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "delete.protected cannot contain empty names".into(),
                ));
            }
        }
        Ok(())
    }
}
