use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::VerdictConfig;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("paths.results_dir cannot be empty")]
    EmptyResultsDir,

    #[error("paths.solutions_dir cannot be empty")]
    EmptySolutionsDir,

    #[error("paths.scores_path cannot be empty")]
    EmptyScoresPath,

    #[error("paths.output_dir cannot be empty")]
    EmptyOutputDir,

    #[error("paths.real_results_dir cannot be empty")]
    EmptyRealResultsDir,

    #[error("selection.output_label cannot be empty")]
    EmptyOutputLabel,

    #[error("Invalid analysis.hard_test_threshold: {0}. Must be within (0, 1]")]
    InvalidHardThreshold(f64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .verdict/config.yaml (project config)
    /// 3. .verdict/local.yaml (project local overrides, optional)
    /// 4. Environment variables (VERDICT_* prefix, highest priority)
    ///
    /// Configuration is project-local (pwd/.verdict/) so one machine can
    /// hold several result sets with different settings.
    pub fn load() -> Result<VerdictConfig> {
        let config: VerdictConfig = Figment::new()
            .merge(Serialized::defaults(VerdictConfig::default()))
            .merge(Yaml::file(".verdict/config.yaml"))
            .merge(Yaml::file(".verdict/local.yaml"))
            .merge(Env::prefixed("VERDICT_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<VerdictConfig> {
        let config: VerdictConfig = Figment::new()
            .merge(Serialized::defaults(VerdictConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("VERDICT_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &VerdictConfig) -> Result<(), ConfigError> {
        if config.paths.results_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyResultsDir);
        }
        if config.paths.solutions_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptySolutionsDir);
        }
        if config.paths.scores_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyScoresPath);
        }
        if config.paths.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        if config.paths.real_results_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRealResultsDir);
        }

        if config.selection.output_label.is_empty() {
            return Err(ConfigError::EmptyOutputLabel);
        }

        let threshold = config.analysis.hard_test_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidHardThreshold(threshold));
        }

        Ok(())
    }
}
