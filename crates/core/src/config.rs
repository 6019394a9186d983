//! TOML configuration for git-id.
//!
//! The file is optional; a missing file yields [`GitIdConfig::default`]. Its
//! location is `$GIT_ID_CONFIG` when set, otherwise
//! `<config dir>/git-id/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GIT_ID_CONFIG";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitIdConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub transport: TransportConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Minimum tracing level: trace, debug, info, warn, error, off.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fail `show` and `use` for identities that are not stored.
    #[serde(default)]
    pub strict: bool,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Exit with status 1 after `reset`. On by default for compatibility with
    /// shell scripts that expect the historical behaviour.
    #[serde(default = "default_true")]
    pub reset_reports_failure: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reset_reports_failure: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    /// ssh client the transport shim forwards to.
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,
}

fn default_ssh_program() -> String {
    "ssh".into()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ssh_program: default_ssh_program(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl GitIdConfig {
    /// Default config file location, honouring `$GIT_ID_CONFIG`.
    pub fn default_path() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => dirs::config_dir().map(|dir| dir.join("git-id").join("config.toml")),
        }
    }

    /// Parse the config file at `path`. A missing file yields the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        info!(path = %path.display(), "loading configuration");
        let contents = std::fs::read_to_string(path)?;
        let config: GitIdConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".into(),
                detail: format!(
                    "'{}' is not one of {}",
                    self.general.log_level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.transport.ssh_program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "transport.ssh_program".into(),
                detail: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Load from [`GitIdConfig::default_path`] and validate.
    pub fn load_and_validate() -> Result<Self, ConfigError> {
        let config = match Self::default_path() {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }
}
