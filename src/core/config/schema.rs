//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [remote]
//! endpoint = "http://localhost:8080/fire"
//! timeout_secs = 30
//!
//! [local]
//! module = "/opt/petri/libpetri_fire.so"
//! fire_symbol = "petri_fire"
//! free_symbol = "petri_free"
//!
//! [editor]
//! report_invalid_edits = true
//! indent = 2
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: the endpoint must be an http(s) URL,
//! the timeout must be positive, symbol names must be non-empty.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ConfigError;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Remote fire service settings
    pub remote: Option<RemoteConfig>,

    /// Local fire module settings
    pub local: Option<LocalConfig>,

    /// Editor behaviour
    pub editor: Option<EditorConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            remote.validate()?;
        }
        if let Some(local) = &self.local {
            local.validate()?;
        }
        if let Some(editor) = &self.editor {
            editor.validate()?;
        }
        Ok(())
    }
}

/// Remote fire service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Full URL of the fire endpoint
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "remote.endpoint must be an http(s) URL, got '{}'",
                    endpoint
                )));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "remote.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Dynamically loaded fire module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    /// Path to the shared library; absent means no local backend
    pub module: Option<PathBuf>,

    /// Exported fire function
    pub fire_symbol: Option<String>,

    /// Exported function releasing strings returned by the fire function
    pub free_symbol: Option<String>,
}

impl LocalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(&self.module, Some(path) if path.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "local.module cannot be empty".to_string(),
            ));
        }
        for (key, value) in [
            ("local.fire_symbol", &self.fire_symbol),
            ("local.free_symbol", &self.free_symbol),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
            }
        }
        Ok(())
    }
}

/// Editor behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Show parse/schema failures of edits on the error banner
    pub report_invalid_edits: Option<bool>,

    /// Indent width of the text pushed into the editor
    pub indent: Option<usize>,
}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.indent, Some(n) if n > 8) {
            return Err(ConfigError::InvalidValue(
                "editor.indent must be between 0 and 8".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FileConfig::default();
        assert!(config.remote.is_none());
        assert!(config.local.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn valid_endpoint() {
        let config = RemoteConfig {
            endpoint: Some("https://fire.example.com/fire".to_string()),
            timeout_secs: Some(5),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let config = RemoteConfig {
            endpoint: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = RemoteConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_symbol_rejected() {
        let config = LocalConfig {
            fire_symbol: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn wide_indent_rejected() {
        let config = EditorConfig {
            indent: Some(12),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn roundtrip() {
        let config = FileConfig {
            remote: Some(RemoteConfig {
                endpoint: Some("http://localhost:9000/fire".to_string()),
                timeout_secs: Some(10),
            }),
            local: Some(LocalConfig {
                module: Some(PathBuf::from("/tmp/libfire.so")),
                fire_symbol: Some("fire".to_string()),
                free_symbol: None,
            }),
            editor: Some(EditorConfig {
                report_invalid_edits: Some(false),
                indent: Some(4),
            }),
        };

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: FileConfig = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            [remote]
            endpoint = "http://localhost:8080/fire"
            retries = 3
        "#;

        let result: Result<FileConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
