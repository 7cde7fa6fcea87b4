//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::TerminationPolicy;
use crate::services::InvestigationConfig;

use super::logging::LogConfig;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid confidence threshold: {0}. Must be within (0, 1]")]
    InvalidConfidenceThreshold(f64),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid min_gain_threshold: {0}. Must be non-negative")]
    InvalidMinGainThreshold(f64),

    #[error("Invalid max_entities_per_network_degree: {0}. Must be at least 1")]
    InvalidNetworkEntityCap(u32),

    #[error("Invalid max_concurrency: {0}. Must be at least 1")]
    InvalidMaxConcurrency(usize),

    #[error("Invalid max_queries_per_iteration: {0}. Must be at least 1")]
    InvalidMaxQueries(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Termination policy knobs.
    pub policy: TerminationPolicy,
    /// Run-level orchestration knobs.
    pub investigation: InvestigationConfig,
    /// Logging knobs.
    pub logging: LogConfig,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .sarengine/config.yaml (project config)
    /// 3. .sarengine/local.yaml (project local overrides, optional)
    /// 4. Environment variables (SARENGINE_* prefix, highest priority)
    ///
    /// Configuration is always project-local (pwd/.sarengine/) so several
    /// deployments on one machine can carry different policies.
    pub fn load() -> Result<EngineConfig> {
        let config: EngineConfig = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::file(".sarengine/config.yaml"))
            .merge(Yaml::file(".sarengine/local.yaml"))
            .merge(Env::prefixed("SARENGINE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<EngineConfig> {
        let config: EngineConfig = Figment::new()
            .merge(Serialized::defaults(EngineConfig::default()))
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
    pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
        for threshold in [
            config.policy.confidence_threshold,
            config.policy.foundation_confidence_threshold,
        ] {
            if threshold <= 0.0 || threshold > 1.0 {
                return Err(ConfigError::InvalidConfidenceThreshold(threshold));
            }
        }

        for cap in [
            config.policy.max_iterations,
            config.policy.foundation_max_iterations,
        ] {
            if cap == 0 {
                return Err(ConfigError::InvalidMaxIterations(cap));
            }
        }

        if config.policy.min_gain_threshold < 0.0 {
            return Err(ConfigError::InvalidMinGainThreshold(
                config.policy.min_gain_threshold,
            ));
        }

        if config.policy.max_entities_per_network_degree == 0 {
            return Err(ConfigError::InvalidNetworkEntityCap(
                config.policy.max_entities_per_network_degree,
            ));
        }

        if config.investigation.max_concurrency == 0 {
            return Err(ConfigError::InvalidMaxConcurrency(
                config.investigation.max_concurrency,
            ));
        }

        if config.investigation.max_queries_per_iteration == 0 {
            return Err(ConfigError::InvalidMaxQueries(
                config.investigation.max_queries_per_iteration,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
