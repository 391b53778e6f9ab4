//! Application configuration.
//!
//! Aggregates configuration into a single Config struct that can be loaded
//! from YAML files or environment variables.

mod store;

pub use store::{RedisConfig, StoreConfig, StoreType};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "CACHE_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "CACHE";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "CACHE_LOG";

use serde::Deserialize;

use crate::error::Result;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key-value store configuration.
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix, e.g.
    ///    `CACHE__STORE__REDIS__URL`
    pub fn load(path: Option<&str>) -> Result<Self> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Create config for testing: in-memory store, flushed on connect.
    pub fn for_test() -> Self {
        Self {
            store: StoreConfig {
                store_type: StoreType::Memory,
                ..StoreConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.store.store_type, StoreType::Redis);
        assert!(config.store.flush_on_connect);
    }

    #[test]
    fn test_config_for_test() {
        let config = Config::for_test();
        assert_eq!(config.store.store_type, StoreType::Memory);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "store:\n  type: memory\n  flush_on_connect: false\n  redis:\n    url: redis://cache:6380/2"
        )
        .unwrap();

        let config = Config::load(Some(file.path().to_str().unwrap())).unwrap();

        assert_eq!(config.store.store_type, StoreType::Memory);
        assert!(!config.store.flush_on_connect);
        assert_eq!(config.store.redis.url, "redis://cache:6380/2");
    }

    #[test]
    fn test_load_missing_required_file_fails() {
        let result = Config::load(Some("/nonexistent/cache-config.yaml"));
        assert!(result.is_err());
    }
}
