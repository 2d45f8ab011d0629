//! Editor configuration.
//!
//! [`CoreConfig`] can be built in code or loaded from TOML. Every field has a default, so a
//! config file only lists what it overrides:
//!
//! ```rust
//! use modal_core::{CoreConfig, EmptyPolicy, LineEnding};
//!
//! let config = CoreConfig::from_toml_str(
//!     r#"
//!     default_line_ending = "crlf"
//!     empty_policy = "all_sub_changes"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.default_line_ending, LineEnding::Crlf);
//! assert_eq!(config.empty_policy, EmptyPolicy::AllSubChanges);
//! assert_eq!(config.max_repeat_count, 10_000);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::EmptyPolicy;
use crate::line_ending::LineEnding;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The config could not be written as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value is out of its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables of the editing core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Newline sequence for content without any line break.
    pub default_line_ending: LineEnding,
    /// Upper bound for repeat counts.
    pub max_repeat_count: usize,
    /// How composite changes are judged empty when recorded.
    pub empty_policy: EmptyPolicy,
    /// Drop empty changes instead of recording them.
    pub skip_empty_changes: bool,
    /// Text inserted by Tab in insert mode.
    pub tab_text: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_line_ending: LineEnding::platform(),
            max_repeat_count: 10_000,
            empty_policy: EmptyPolicy::default(),
            skip_empty_changes: true,
            tab_text: "\t".to_string(),
        }
    }
}

impl CoreConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_repeat_count == 0 {
            return Err(ConfigError::Invalid(
                "max_repeat_count must be at least 1".to_string(),
            ));
        }
        if self.tab_text.is_empty() {
            return Err(ConfigError::Invalid("tab_text must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(CoreConfig::from_toml_str("").unwrap(), CoreConfig::default());
    }

    #[test]
    fn test_rejects_zero_repeat_count() {
        let err = CoreConfig::from_toml_str("max_repeat_count = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = CoreConfig::from_toml_str("tab_width = 4").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CoreConfig {
            tab_text: "    ".to_string(),
            skip_empty_changes: false,
            ..CoreConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(CoreConfig::from_toml_str(&text).unwrap(), config);
    }
}
