//! # Runtime Configuration Module
//!
//! Settings that change how console paths are resolved, loaded from an
//! optional TOML file and then overridden by environment variables.
//!
//! ## Environment Variables
//!
//! ### `BANYANDB_UI_BASE_URL`
//!
//! Prefix the console is served under (the history base). Incoming paths have
//! it stripped before matching and `url_for` prepends it.
//!
//! Default: `/`
//!
//! ### `BANYANDB_UI_MAX_REDIRECTS`
//!
//! Ceiling on redirect hops for a single navigation. Reaching it fails the
//! navigation with a redirect-loop error instead of spinning forever.
//!
//! Default: `10`
//!
//! ### `BANYANDB_UI_SENSITIVE`
//!
//! `true` makes literal path segments case-sensitive.
//!
//! Default: `false`
//!
//! ## Config File
//!
//! ```toml
//! base = "/ui"
//! max_redirects = 5
//! sensitive = false
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use banyandb_ui_router::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("max redirects: {}", config.max_redirects);
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub const ENV_BASE_URL: &str = "BANYANDB_UI_BASE_URL";
pub const ENV_MAX_REDIRECTS: &str = "BANYANDB_UI_MAX_REDIRECTS";
pub const ENV_SENSITIVE: &str = "BANYANDB_UI_SENSITIVE";

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("max_redirects must be at least 1")]
    NoRedirectBudget,
    #[error("base `{0}` must start with `/`")]
    RelativeBase(String),
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// History base the console is mounted under
    pub base: String,
    /// Redirect hops allowed per navigation
    pub max_redirects: usize,
    /// Case-sensitive literal segments
    pub sensitive: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
            max_redirects: Self::DEFAULT_MAX_REDIRECTS,
            sensitive: false,
        }
    }
}

impl RouterConfig {
    pub const DEFAULT_MAX_REDIRECTS: usize = 10;

    /// Defaults overridden by environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Load the optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`; unparsable values are ignored with a warning.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_BASE_URL) {
            if base.starts_with('/') {
                self.base = base;
            } else {
                warn!(key = ENV_BASE_URL, value = %base, "Ignoring relative base");
            }
        }
        if let Some(raw) = lookup(ENV_MAX_REDIRECTS) {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => self.max_redirects = n,
                _ => warn!(key = ENV_MAX_REDIRECTS, value = %raw, "Ignoring invalid redirect budget"),
            }
        }
        if let Some(raw) = lookup(ENV_SENSITIVE) {
            match raw.parse::<bool>() {
                Ok(b) => self.sensitive = b,
                Err(_) => warn!(key = ENV_SENSITIVE, value = %raw, "Ignoring invalid boolean"),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_redirects == 0 {
            return Err(ConfigError::NoRedirectBudget);
        }
        if !self.base.starts_with('/') {
            return Err(ConfigError::RelativeBase(self.base.clone()));
        }
        Ok(())
    }

    /// The base without its trailing slash; empty when mounted at the root.
    #[must_use]
    pub fn normalized_base(&self) -> &str {
        self.base.trim_end_matches('/')
    }
}
