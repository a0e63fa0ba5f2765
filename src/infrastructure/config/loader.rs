use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::STRATEGY_COUNT;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_attempts: {0}. Must be between 1 and {max}", max = STRATEGY_COUNT)]
    InvalidMaxAttempts(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid {0}: must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("database.connect_timeout_ms ({connect}) must be greater than database.busy_timeout_ms ({busy})")]
    TimeoutOrder { busy: u64, connect: u64 },

    #[error("Server host cannot be empty")]
    EmptyServerHost,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .initials/config.yaml (project config, created by init)
    /// 3. .initials/local.yaml (local overrides, optional)
    /// 4. `extra`, an explicit file passed with --config
    /// 5. Environment variables (INITIALS_* prefix, `__` separates nested keys)
    pub fn load(extra: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".initials/config.yaml"))
            .merge(Yaml::file(".initials/local.yaml"));

        if let Some(path) = extra {
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed("INITIALS_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        if config.database.busy_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("database.busy_timeout_ms"));
        }

        if config.database.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("database.connect_timeout_ms"));
        }

        // A statement timeout shorter than the lock wait can report an insert
        // as failed while it still commits.
        if config.database.connect_timeout_ms <= config.database.busy_timeout_ms {
            return Err(ConfigError::TimeoutOrder {
                busy: config.database.busy_timeout_ms,
                connect: config.database.connect_timeout_ms,
            });
        }

        let max_attempts = config.allocation.max_attempts;
        if max_attempts == 0 || max_attempts as usize > STRATEGY_COUNT {
            return Err(ConfigError::InvalidMaxAttempts(max_attempts));
        }

        if config.allocation.deadline_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout("allocation.deadline_ms"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.server.host.is_empty() {
            return Err(ConfigError::EmptyServerHost);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{LogFormat, TransientPolicy};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, ".initials/initials.db");
        assert_eq!(config.allocation.max_attempts, 9);
        assert_eq!(config.allocation.max_transient_retries, 8);
        assert_eq!(config.allocation.transient_delay_ms, 8_000);
        assert_eq!(config.allocation.on_transient, TransientPolicy::RetrySame);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/initials.db
  busy_timeout_ms: 250
allocation:
  transient_delay_ms: 100
  on_transient: advance
  deadline_ms: 30000
logging:
  level: debug
  format: json
server:
  port: 9000
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.database.path, "/custom/initials.db");
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert_eq!(config.database.connect_timeout_ms, 10_000);
        assert_eq!(config.allocation.transient_delay_ms, 100);
        assert_eq!(config.allocation.on_transient, TransientPolicy::Advance);
        assert_eq!(config.allocation.deadline_ms, Some(30_000));
        assert_eq!(config.allocation.max_attempts, 9);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_max_attempts_bounds() {
        let mut config = Config::default();
        config.allocation.max_attempts = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxAttempts(0))
        ));

        config.allocation.max_attempts = 10;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxAttempts(10))
        ));

        config.allocation.max_attempts = 3;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));
    }

    #[test]
    fn test_validate_zero_timeouts() {
        let mut config = Config::default();
        config.database.busy_timeout_ms = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ZeroTimeout("database.busy_timeout_ms"))
        ));

        let mut config = Config::default();
        config.allocation.deadline_ms = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ZeroTimeout("allocation.deadline_ms"))
        ));
    }

    #[test]
    fn test_validate_statement_timeout_exceeds_busy_timeout() {
        let mut config = Config::default();
        config.database.busy_timeout_ms = 10_000;
        config.database.connect_timeout_ms = 10_000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::TimeoutOrder {
                busy: 10_000,
                connect: 10_000
            })
        ));

        config.database.connect_timeout_ms = 10_001;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "allocation:\n  max_transient_retries: 2\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).expect("config should load");
        assert_eq!(config.allocation.max_transient_retries, 2);
        assert_eq!(config.allocation.max_attempts, 9);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("override.yaml");
        std::fs::write(&path, "database:\n  path: from-file.db\n").unwrap();

        temp_env::with_vars(
            [
                ("INITIALS_DATABASE__PATH", Some("from-env.db")),
                ("INITIALS_ALLOCATION__ON_TRANSIENT", Some("advance")),
            ],
            || {
                let config = ConfigLoader::load(Some(&path)).expect("config should load");
                assert_eq!(config.database.path, "from-env.db");
                assert_eq!(config.allocation.on_transient, TransientPolicy::Advance);
            },
        );
    }

    #[test]
    fn test_invalid_env_value_fails_validation() {
        temp_env::with_var("INITIALS_ALLOCATION__MAX_ATTEMPTS", Some("12"), || {
            assert!(ConfigLoader::load(None).is_err());
        });
    }
}
