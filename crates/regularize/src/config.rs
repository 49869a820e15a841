//! Configuration for regularize.
//!
//! The only process-wide setting is the capacity of the shared
//! compiled-pattern cache. Sources, in increasing precedence:
//!
//! 1. built-in defaults;
//! 2. a TOML file named by `REGULARIZE_CONFIG`;
//! 3. `REGULARIZE_*` environment variables.
//!
//! ```toml
//! [cache]
//! capacity = 512
//! ```

mod env;

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

pub use env::{DEFAULT_PREFIX, EnvConfig, vars};

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::{RegularizeError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegularizeConfig {
    /// Compiled-pattern cache configuration.
    pub cache: CacheConfig,
}

/// Configuration for the compiled-pattern cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of compiled patterns kept.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a cache configuration with the given capacity.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl RegularizeConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = RegularizeError::with_io_context(
            std::fs::read_to_string(path),
            format!("reading {}", path.display()),
        )?;
        Self::from_toml_str(&text)
    }

    /// Apply environment overrides on top of this configuration.
    pub fn with_env(mut self, env: &EnvConfig) -> Result<Self> {
        if let Some(raw) = env.get(vars::CACHE_CAPACITY) {
            self.cache.capacity = raw.trim().parse().map_err(|_| {
                RegularizeError::config(format!(
                    "{}_{} must be a positive integer, got {raw:?}",
                    DEFAULT_PREFIX,
                    vars::CACHE_CAPACITY
                ))
            })?;
        }
        self.validate()
    }

    /// Build the configuration from a config file (if named) and the environment.
    pub fn try_load(env: &EnvConfig) -> Result<Self> {
        let base = match env.get(vars::CONFIG) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(env)
    }

    /// Like [`try_load`](Self::try_load) against the process environment,
    /// falling back to defaults on error.
    #[must_use]
    pub fn load() -> Self {
        Self::try_load(&EnvConfig::default()).unwrap_or_else(|error| {
            warn!(%error, "ignoring invalid regularize configuration");
            Self::default()
        })
    }

    /// Check invariants.
    pub fn validate(self) -> Result<Self> {
        if self.cache.capacity == 0 {
            return Err(RegularizeError::config("cache capacity must be positive"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated_env() -> EnvConfig {
        EnvConfig::new("REGULARIZE_CONFIG_UNIT_TEST")
    }

    #[test]
    fn defaults() {
        let config = RegularizeConfig::default();
        assert_eq!(config.cache.capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(RegularizeConfig::try_load(&isolated_env()).unwrap(), config);
    }

    #[test]
    fn parses_toml() {
        let config = RegularizeConfig::from_toml_str("[cache]\ncapacity = 12\n").unwrap();
        assert_eq!(config.cache.capacity, 12);
        assert_eq!(
            RegularizeConfig::from_toml_str("").unwrap(),
            RegularizeConfig::default()
        );
    }

    #[test]
    fn rejects_unknown_keys_and_zero() {
        assert!(matches!(
            RegularizeConfig::from_toml_str("[cache]\nsize = 3\n"),
            Err(RegularizeError::Toml(_))
        ));
        assert!(matches!(
            RegularizeConfig::from_toml_str("[cache]\ncapacity = 0\n"),
            Err(RegularizeError::Config { .. })
        ));
    }

    #[test]
    fn env_overrides() {
        let env = isolated_env().with_override(vars::CACHE_CAPACITY, "7");
        let config = RegularizeConfig::default().with_env(&env).unwrap();
        assert_eq!(config.cache.capacity, 7);

        let bad = isolated_env().with_override(vars::CACHE_CAPACITY, "lots");
        assert!(RegularizeConfig::default().with_env(&bad).is_err());
    }

    #[test]
    fn missing_file_has_context() {
        let env = isolated_env().with_override(vars::CONFIG, "/nonexistent/regularize.toml");
        let err = RegularizeConfig::try_load(&env).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/regularize.toml"));
    }
}
