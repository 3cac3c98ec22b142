use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::{Config, MAX_CONCURRENT_TASKS_CEILING};

/// Directory holding project-local configuration.
pub const CONFIG_DIR: &str = ".lynx";

/// Prefix for environment overrides, e.g. `LYNX_ORCHESTRATOR__MAX_CONCURRENT_TASKS`.
pub const ENV_PREFIX: &str = "LYNX_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_concurrent_tasks: {0}. Must be between 1 and 100")]
    InvalidMaxConcurrentTasks(usize),

    #[error("Invalid quality_threshold: {0}. Must be between 0.0 and 1.0")]
    InvalidQualityThreshold(f64),

    #[error("Invalid tick_interval_ms: {0}. Must be positive")]
    InvalidTickInterval(u64),

    #[error("Invalid timeout factor: {0}. Must be a positive number")]
    InvalidTimeoutFactor(f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `.lynx/config.yaml`
    /// 3. `.lynx/local.yaml` (optional developer overrides)
    /// 4. `LYNX_*` environment variables, `__` separating nested keys
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Same as [`load`](Self::load) rooted at `project_dir`.
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Config> {
        let config_dir = project_dir.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(config_dir.join("config.yaml")))
            .merge(Yaml::file(config_dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, without env overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let orchestrator = &config.orchestrator;

        if orchestrator.max_concurrent_tasks == 0
            || orchestrator.max_concurrent_tasks > MAX_CONCURRENT_TASKS_CEILING
        {
            return Err(ConfigError::InvalidMaxConcurrentTasks(
                orchestrator.max_concurrent_tasks,
            ));
        }

        if !(0.0..=1.0).contains(&orchestrator.quality_threshold) {
            return Err(ConfigError::InvalidQualityThreshold(
                orchestrator.quality_threshold,
            ));
        }

        if orchestrator.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval(orchestrator.tick_interval_ms));
        }

        if let Some(factor) = orchestrator.timeouts.factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConfigError::InvalidTimeoutFactor(factor));
            }
        }

        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ProgressAnchor, ProgressCap, TaskCategory};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.orchestrator.max_concurrent_tasks, 10);
        assert!((config.orchestrator.quality_threshold - 0.8).abs() < f64::EPSILON);
        assert!(config.orchestrator.auto_deploy_enabled);
        assert_eq!(config.orchestrator.tick_interval_ms, 60_000);
        assert!(config.orchestrator.gates.suppress_duplicates);
        assert!(config.orchestrator.timeouts.factor.is_none());
        assert_eq!(config.database.path, ".lynx/lynx.db");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
orchestrator:
  max_concurrent_tasks: 3
  quality_threshold: 0.9
  tick_interval_ms: 5000
  progress:
    anchor: updated_at
    cap: before_multiplier
  timeouts:
    factor: 2.0
  agents:
    portal: false
database:
  path: /custom/path.db
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");
        let orchestrator = &config.orchestrator;

        assert_eq!(orchestrator.max_concurrent_tasks, 3);
        assert!((orchestrator.quality_threshold - 0.9).abs() < f64::EPSILON);
        assert!(orchestrator.auto_deploy_enabled);
        assert_eq!(orchestrator.progress.anchor, ProgressAnchor::UpdatedAt);
        assert_eq!(orchestrator.progress.cap, ProgressCap::BeforeMultiplier);
        assert_eq!(orchestrator.timeouts.factor, Some(2.0));
        assert!(!orchestrator.agents.is_enabled(TaskCategory::Portal));
        assert!(orchestrator.agents.is_enabled(TaskCategory::Api));
        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        for bad in [0, 101] {
            let mut config = Config::default();
            config.orchestrator.max_concurrent_tasks = bad;
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidMaxConcurrentTasks(n)) if n == bad
            ));
        }
    }

    #[test]
    fn test_validate_quality_threshold() {
        let mut config = Config::default();
        config.orchestrator.quality_threshold = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidQualityThreshold(_))
        ));
    }

    #[test]
    fn test_validate_zero_tick_interval() {
        let mut config = Config::default();
        config.orchestrator.tick_interval_ms = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTickInterval(0))
        ));
    }

    #[test]
    fn test_validate_timeout_factor() {
        let mut config = Config::default();
        config.orchestrator.timeouts.factor = Some(0.0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTimeoutFactor(_))
        ));
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
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogRotation(_))
        ));
    }

    #[test]
    fn test_validate_database() {
        let mut config = Config::default();
        config.database.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));

        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_load_from_file_merges_over_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "orchestrator:\n  max_concurrent_tasks: 4").unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.orchestrator.max_concurrent_tasks, 4);
        assert_eq!(config.orchestrator.tick_interval_ms, 60_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "orchestrator:\n  max_concurrent_tasks: 500").unwrap();
        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.yaml"),
            "orchestrator:\n  max_concurrent_tasks: 4\n  quality_threshold: 0.7\n",
        )
        .unwrap();
        std::fs::write(
            config_dir.join("local.yaml"),
            "orchestrator:\n  max_concurrent_tasks: 6\n",
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("LYNX_ORCHESTRATOR__QUALITY_THRESHOLD", Some("0.9")),
                ("LYNX_ORCHESTRATOR__AGENTS__SECURITY", Some("false")),
                ("LYNX_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.orchestrator.max_concurrent_tasks, 6);
                assert!((config.orchestrator.quality_threshold - 0.9).abs() < f64::EPSILON);
                assert!(!config.orchestrator.agents.is_enabled(TaskCategory::Security));
                assert_eq!(config.logging.level, "debug");
            },
        );
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        temp_env::with_vars_unset(
            ["LYNX_ORCHESTRATOR__MAX_CONCURRENT_TASKS", "LYNX_LOGGING__LEVEL"],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.orchestrator.max_concurrent_tasks, 10);
            },
        );
    }
}
