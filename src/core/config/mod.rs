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
//! 1. `$PETRISCOPE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/petriscope/config.toml`
//! 3. `~/.petriscope/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use petriscope::core::config::Config;
//!
//! let result = Config::load().unwrap();
//! let config = result.config;
//! println!("Fire endpoint: {}", config.remote_endpoint());
//! if let Some(module) = config.local_module() {
//!     println!("Local module: {}", module.display());
//! }
//! ```

pub mod schema;

pub use schema::{EditorConfig, FileConfig, LocalConfig, RemoteConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PETRISCOPE_CONFIG";

/// Fire endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/fire";

/// Remote request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default exported fire function of a local module.
pub const DEFAULT_FIRE_SYMBOL: &str = "petri_fire";

/// Default exported string release function of a local module.
pub const DEFAULT_FREE_SYMBOL: &str = "petri_free";

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

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Effective configuration.
///
/// Accessors apply defaults for anything the file leaves out.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: FileConfig,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed or
    /// validated. A missing file is not an error (defaults are used).
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let file = Self::read_file(path)?;
        file.validate()?;
        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    fn load_with(
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        // 1. Check $PETRISCOPE_CONFIG
        if let Some(path) = env(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(ConfigLoadResult {
                    config: Self::load_from(&path)?,
                    warnings,
                });
            }
            warnings.push(ConfigWarning {
                message: format!("{} points to a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/petriscope/config.toml
        // 3. Check ~/.petriscope/config.toml
        let candidates = env("XDG_CONFIG_HOME")
            .map(|xdg| PathBuf::from(xdg).join("petriscope/config.toml"))
            .into_iter()
            .chain(home.map(|h| h.join(".petriscope/config.toml")));
        for path in candidates {
            if path.exists() {
                return Ok(ConfigLoadResult {
                    config: Self::load_from(&path)?,
                    warnings,
                });
            }
        }

        // No config found, use defaults
        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// URL of the remote fire endpoint.
    pub fn remote_endpoint(&self) -> &str {
        self.file
            .remote
            .as_ref()
            .and_then(|r| r.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Remote request timeout.
    pub fn remote_timeout(&self) -> Duration {
        let secs = self
            .file
            .remote
            .as_ref()
            .and_then(|r| r.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Path of the local fire module, if one is configured.
    pub fn local_module(&self) -> Option<&Path> {
        self.file.local.as_ref().and_then(|l| l.module.as_deref())
    }

    /// Exported fire function name.
    pub fn fire_symbol(&self) -> &str {
        self.file
            .local
            .as_ref()
            .and_then(|l| l.fire_symbol.as_deref())
            .unwrap_or(DEFAULT_FIRE_SYMBOL)
    }

    /// Exported string release function name.
    pub fn free_symbol(&self) -> &str {
        self.file
            .local
            .as_ref()
            .and_then(|l| l.free_symbol.as_deref())
            .unwrap_or(DEFAULT_FREE_SYMBOL)
    }

    /// Whether rejected editor edits are shown on the error banner.
    ///
    /// Defaults to `true`.
    pub fn report_invalid_edits(&self) -> bool {
        self.file
            .editor
            .as_ref()
            .and_then(|e| e.report_invalid_edits)
            .unwrap_or(true)
    }

    /// Indent width for text pushed into the editor.
    pub fn editor_indent(&self) -> usize {
        self.file
            .editor
            .as_ref()
            .and_then(|e| e.indent)
            .unwrap_or(crate::core::codec::DEFAULT_INDENT)
    }

    /// Override the remote endpoint (CLI flag precedence).
    ///
    /// The value is checked like one read from the file; on error the
    /// configuration is left unchanged.
    pub fn set_remote_endpoint(&mut self, endpoint: impl Into<String>) -> Result<(), ConfigError> {
        let mut remote = self.file.remote.clone().unwrap_or_default();
        remote.endpoint = Some(endpoint.into());
        remote.validate()?;
        self.file.remote = Some(remote);
        Ok(())
    }

    /// Override the local module path (CLI flag precedence).
    pub fn set_local_module(&mut self, module: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let mut local = self.file.local.clone().unwrap_or_default();
        local.module = Some(module.into());
        local.validate()?;
        self.file.local = Some(local);
        Ok(())
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
