// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Proxy configuration.
//!
//! Settings load from TOML, then environment overrides are applied:
//!
//! ```text
//! UA_PROXY_ENUM_POLICY=strict
//! UA_PROXY_NEGATIVE_CACHING=false
//! UA_PROXY_LOG_LEVEL=debug
//! UA_PROXY_LOG_FORMAT=json
//! ```
//!
//! A complete file:
//!
//! ```toml
//! enum_policy = "strict"
//!
//! [cache]
//! negative_caching = false
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::EnumPolicy;
use crate::error::{ConfigurationError, ProxyResult};
use crate::logging::{parse_level, LogFormat};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "UA_PROXY";

// =============================================================================
// Schema
// =============================================================================

/// Proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// How unknown enumeration codes decode.
    pub enum_policy: EnumPolicy,
    /// Child cache settings.
    pub cache: CacheConfig,
    /// Logging settings for applications calling [`init_logging`](crate::logging::init_logging).
    pub logging: LoggingConfig,
}

/// Child cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoize "child not found" outcomes.
    pub negative_caching: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            negative_caching: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level name.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl ProxyConfig {
    /// Checks field values.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if parse_level(&self.logging.level).is_none() {
            return Err(ConfigurationError::invalid_value(
                "logging.level",
                &self.logging.level,
                "expected trace, debug, info, warn or error",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Loads [`ProxyConfig`] from TOML with environment overrides.
///
/// ```no_run
/// use ua_proxy::config::ConfigLoader;
///
/// let config = ConfigLoader::new().load("ua-proxy.toml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: String,
    apply_env: bool,
}

impl ConfigLoader {
    /// Creates a loader with the default prefix and overrides enabled.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            apply_env: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment overrides.
    pub fn with_env_overrides(mut self, enabled: bool) -> Self {
        self.apply_env = enabled;
        self
    }

    /// Loads a TOML file.
    pub fn load(&self, path: impl AsRef<Path>) -> ProxyResult<ProxyConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading proxy configuration");

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigurationError::io(path.display().to_string(), e))?;
        let config: ProxyConfig = toml::from_str(&content).map_err(|e| {
            ConfigurationError::parse_failed(Some(path.display().to_string()), e.to_string())
        })?;

        self.finish(config)
    }

    /// Loads TOML text.
    pub fn load_from_str(&self, content: &str) -> ProxyResult<ProxyConfig> {
        let config: ProxyConfig = toml::from_str(content)
            .map_err(|e| ConfigurationError::parse_failed(None, e.to_string()))?;
        self.finish(config)
    }

    /// Builds a configuration from defaults and the environment only.
    pub fn from_env(&self) -> ProxyResult<ProxyConfig> {
        self.finish(ProxyConfig::default())
    }

    fn finish(&self, mut config: ProxyConfig) -> ProxyResult<ProxyConfig> {
        if self.apply_env {
            self.apply_env_overrides(&mut config)?;
        }
        config.validate()?;

        debug!(
            enum_policy = %config.enum_policy,
            negative_caching = config.cache.negative_caching,
            log_level = %config.logging.level,
            log_format = %config.logging.format,
            "Proxy configuration ready"
        );
        Ok(config)
    }

    fn var(&self, suffix: &str) -> (String, Option<String>) {
        let name = format!("{}_{}", self.env_prefix, suffix);
        let value = env::var(&name).ok();
        (name, value)
    }

    fn apply_env_overrides(&self, config: &mut ProxyConfig) -> Result<(), ConfigurationError> {
        if let (name, Some(value)) = self.var("ENUM_POLICY") {
            config.enum_policy = value.parse().map_err(|_| {
                ConfigurationError::invalid_environment(&name, &value, "expected permissive or strict")
            })?;
        }

        if let (name, Some(value)) = self.var("NEGATIVE_CACHING") {
            config.cache.negative_caching = parse_bool(&value).ok_or_else(|| {
                ConfigurationError::invalid_environment(&name, &value, "expected a boolean")
            })?;
        }

        if let (name, Some(value)) = self.var("LOG_LEVEL") {
            if parse_level(&value).is_none() {
                return Err(ConfigurationError::invalid_environment(
                    &name,
                    &value,
                    "expected trace, debug, info, warn or error",
                ));
            }
            config.logging.level = value.trim().to_lowercase();
        }

        if let (name, Some(value)) = self.var("LOG_FORMAT") {
            config.logging.format = value.parse().map_err(|_| {
                ConfigurationError::invalid_environment(&name, &value, "expected text, json or compact")
            })?;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ProxyError;

    // Each test uses its own prefix so parallel tests do not share variables.
    fn loader(prefix: &str) -> ConfigLoader {
        ConfigLoader::new().with_env_prefix(prefix)
    }

    #[test]
    fn test_defaults() {
        let config = loader("UA_PROXY_TEST_DEFAULTS").load_from_str("").unwrap();
        assert_eq!(config, ProxyConfig::default());
        assert_eq!(config.enum_policy, EnumPolicy::Permissive);
        assert!(config.cache.negative_caching);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "enum_policy = \"strict\"\n[cache]\nnegative_caching = false\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = loader("UA_PROXY_TEST_FILE").load(file.path()).unwrap();
        assert_eq!(config.enum_policy, EnumPolicy::Strict);
        assert!(!config.cache.negative_caching);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader("UA_PROXY_TEST_MISSING")
            .load(dir.path().join("absent.toml"))
            .unwrap_err();
        assert!(matches!(
            err,
            ProxyError::Configuration(ConfigurationError::Io { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        let err = loader("UA_PROXY_TEST_PARSE")
            .load_from_str("enum_policy = \"sometimes\"")
            .unwrap_err();
        assert!(matches!(
            err,
            ProxyError::Configuration(ConfigurationError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let prefix = "UA_PROXY_TEST_ENV";
        env::set_var(format!("{}_ENUM_POLICY", prefix), "STRICT");
        env::set_var(format!("{}_NEGATIVE_CACHING", prefix), "off");
        env::set_var(format!("{}_LOG_LEVEL", prefix), "Debug");

        let config = loader(prefix).load_from_str("").unwrap();
        assert_eq!(config.enum_policy, EnumPolicy::Strict);
        assert!(!config.cache.negative_caching);
        assert_eq!(config.logging.level, "debug");

        let ignored = loader(prefix)
            .with_env_overrides(false)
            .load_from_str("")
            .unwrap();
        assert_eq!(ignored.enum_policy, EnumPolicy::Permissive);
    }

    #[test]
    fn test_invalid_env_override() {
        let prefix = "UA_PROXY_TEST_BAD_ENV";
        env::set_var(format!("{}_NEGATIVE_CACHING", prefix), "maybe");

        let err = loader(prefix).from_env().unwrap_err();
        match err {
            ProxyError::Configuration(ConfigurationError::InvalidEnvironment { variable, .. }) => {
                assert_eq!(variable, "UA_PROXY_TEST_BAD_ENV_NEGATIVE_CACHING");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_level_rejected() {
        let err = loader("UA_PROXY_TEST_LEVEL")
            .load_from_str("[logging]\nlevel = \"chatty\"")
            .unwrap_err();
        assert!(matches!(
            err,
            ProxyError::Configuration(ConfigurationError::InvalidValue { .. })
        ));
    }
}
