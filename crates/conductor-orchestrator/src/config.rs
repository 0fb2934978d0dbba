//! Configuration for execution limits, retry policy, and analysis defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OrchestratorError, Result};

/// Complete orchestrator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Execution configuration.
    pub execution: ExecutionConfig,
    /// Analysis defaults.
    pub analysis: AnalysisConfig,
}

/// Execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Concurrency cap within one scheduling level.
    pub max_concurrent_subtasks: usize,
    /// Per-invocation timeout in seconds.
    pub subtask_timeout_seconds: u64,
    /// Retry attempts after the first failure of a retryable invocation.
    pub max_retries: usize,
    /// Base backoff between retries, in milliseconds; grows linearly per
    /// attempt.
    pub retry_backoff_ms: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_subtasks: 4,
            subtask_timeout_seconds: 30,
            max_retries: 2,
            retry_backoff_ms: 200,
        }
    }
}

/// Analysis defaults applied when the intent carries no explicit window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Default lookback window in days.
    pub default_timeframe_days: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_timeframe_days: 7,
        }
    }
}

impl OrchestratorConfig {
    /// Get the default config directory path (`~/.conductor`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        use dirs::home_dir;
        let home = home_dir().ok_or_else(|| {
            OrchestratorError::Config("Could not determine home directory".to_owned())
        })?;
        Ok(home.join(".conductor"))
    }

    /// Get the default config file path (`~/.conductor/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location (`~/.conductor/config.toml`)
    /// If the config doesn't exist, creates it with default values
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        use toml::from_str;
        let contents = fs::read_to_string(path)
            .map_err(|error| OrchestratorError::Config(format!("Failed to read config: {error}")))?;
        from_str(&contents)
            .map_err(|error| OrchestratorError::Config(format!("Failed to parse config: {error}")))
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        use toml::to_string_pretty;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                OrchestratorError::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = to_string_pretty(self).map_err(|error| {
            OrchestratorError::Config(format!("Failed to serialize config: {error}"))
        })?;

        let header = "# Conductor Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| OrchestratorError::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }
}
