use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {field}: {value}. Must be between 0.0 and 1.0")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("Invalid {field}: {value}. Must be non-negative")]
    NegativeWeight { field: &'static str, value: f64 },

    #[error("Invalid max_examples: {0}. Must be at least 1")]
    InvalidMaxExamples(usize),

    #[error("Invalid {field}: must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("Storage key cannot be empty")]
    EmptyStorageKey,

    #[error("Storage path cannot be empty")]
    EmptyStoragePath,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .fluency/config.yaml (project config)
    /// 3. .fluency/local.yaml (local overrides, optional)
    /// 4. Environment variables (FLUENCY_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("FLUENCY_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".fluency/config.yaml"))
            .merge(Yaml::file(".fluency/local.yaml"))
            .merge(Env::prefixed("FLUENCY_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.storage.key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if config.storage.path.trim().is_empty() {
            return Err(ConfigError::EmptyStoragePath);
        }

        check_probability("analysis.min_confidence", config.analysis.min_confidence)?;
        if config.analysis.max_examples == 0 {
            return Err(ConfigError::InvalidMaxExamples(0));
        }
        if config.analysis.min_match_count == 0 {
            return Err(ConfigError::ZeroCount {
                field: "analysis.min_match_count",
            });
        }
        if config.remediation.min_attempts_to_resolve == 0 {
            return Err(ConfigError::ZeroCount {
                field: "remediation.min_attempts_to_resolve",
            });
        }

        check_probability("remediation.resolve_score", config.remediation.resolve_score)?;
        check_probability("priority.stalled_score", config.priority.stalled_score)?;

        let weights = [
            ("priority.severity_weight", config.priority.severity_weight),
            ("priority.confidence_weight", config.priority.confidence_weight),
            ("priority.recency_boost", config.priority.recency_boost),
            ("priority.in_progress_boost", config.priority.in_progress_boost),
            ("priority.stalled_penalty", config.priority.stalled_penalty),
        ];
        for (field, value) in weights {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::NegativeWeight { field, value });
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}
