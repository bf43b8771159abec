//! Policy-as-data configuration for plateroi.
//!
//! Collects the tunables around the engine (name template, notification
//! queue bounds, log filter) into one [`RegionsConfig`] that can be loaded
//! from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # plateroi.toml
//! [naming]
//! template = "{work_number}-{run_name}-R{index}"
//! index_width = 2
//!
//! [notifications]
//! capacity = 16
//! ```
//!
//! ```rust,ignore
//! let config = RegionsConfig::from_toml_file("plateroi.toml")?;
//! let labeler = config.to_labeler()?;
//! ```
//!
//! # Defaults
//!
//! `RegionsConfig::default()` matches the constants the engine uses when no
//! file is given, so a missing file and an empty file behave the same.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::labeling::{DEFAULT_TEMPLATE, TemplateError, TemplateLabeler};
use crate::notify::NotificationQueue;

// ---------------------------------------------------------------------------
// Top-level RegionsConfig
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegionsConfig {
    /// Region display-name template.
    pub naming: NamingConfig,

    /// Warning queue behaviour.
    pub notifications: NotificationConfig,

    /// Log filter and output format for binaries.
    pub logging: LoggingConfig,
}

impl RegionsConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.into_validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.into_validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = TemplateLabeler::new(&self.naming.template, self.naming.index_width) {
            errors.push(format!("naming.template: {e}"));
        }

        if self.naming.index_width > 9 {
            errors.push(format!(
                "naming.index_width must be <= 9, got {}",
                self.naming.index_width
            ));
        }

        if self.notifications.capacity == 0 {
            errors.push("notifications.capacity must be > 0".into());
        }

        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be empty".into());
        }

        errors
    }

    fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the [`TemplateLabeler`] described by `naming`.
    pub fn to_labeler(&self) -> Result<TemplateLabeler, TemplateError> {
        TemplateLabeler::new(&self.naming.template, self.naming.index_width)
    }

    /// Build an empty [`NotificationQueue`] with the configured bounds.
    #[must_use]
    pub fn to_notification_queue(&self) -> NotificationQueue {
        NotificationQueue::new(
            self.notifications.capacity,
            self.notifications.dedupe_consecutive,
        )
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Display-name template settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NamingConfig {
    /// Placeholders: `{run_name}`, `{work_number}`, `{index}`, `{first}`.
    pub template: String,
    /// Zero-pad width for `{index}`; 0 disables padding.
    pub index_width: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            index_width: 0,
        }
    }
}

/// Warning queue settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NotificationConfig {
    pub capacity: usize,
    pub dedupe_consecutive: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            dedupe_consecutive: true,
        }
    }
}

/// Logging settings consumed by binaries that install a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading a config.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RegionsConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert!(config.to_labeler().is_ok());
        assert_eq!(config.to_notification_queue().len(), 0);
    }

    #[test]
    fn validate_collects_every_problem() {
        let config = RegionsConfig {
            naming: NamingConfig {
                template: "{run_name}".into(),
                index_width: 12,
            },
            notifications: NotificationConfig {
                capacity: 0,
                dedupe_consecutive: false,
            },
            logging: LoggingConfig {
                filter: " ".into(),
                json: true,
            },
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors[0].starts_with("naming.template"));
    }

    #[test]
    fn validation_error_display_joins_messages() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_partial_sections_fill_defaults() {
        let config = RegionsConfig::from_toml_str(
            r#"
            [naming]
            index_width = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.naming.template, DEFAULT_TEMPLATE);
        assert_eq!(config.naming.index_width, 2);
        assert_eq!(config.notifications, NotificationConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_invalid_template_is_rejected() {
        let err = RegionsConfig::from_toml_str(
            r#"
            [naming]
            template = "{nope}"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_loads() {
        let config =
            RegionsConfig::from_json_str(r#"{"logging":{"filter":"debug","json":true}}"#).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "debug");
    }
}
