use std::io;
use std::result::Result as StdResult;

use conductor_core::Error as CoreError;
use conductor_core::types::SubTaskId;
use serde_json::Error as JsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for orchestrator operations.
pub type Result<T> = StdResult<T, OrchestratorError>;

/// Errors that can occur while orchestrating a task.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A core-layer error bubbled up.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] JsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// The subtask dependency graph contains a cycle. Fatal: aborts the
    /// whole task before execution begins.
    #[error("Cyclic dependency among subtasks: {stuck:?}")]
    CycleDetected {
        /// Subtasks left unprocessable when progress stalled; includes at
        /// least one member of every cycle.
        stuck: Vec<SubTaskId>,
    },

    /// A subtask names a provider key nobody registered. Configuration
    /// error, not a runtime panic.
    #[error("Unknown capability provider: {0}")]
    UnknownProvider(String),

    /// A capability invocation exceeded its time budget.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Planning produced an unusable subtask set.
    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    /// Task execution failed outside any single subtask.
    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl OrchestratorError {
    /// Determines whether a retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Core(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_names_stuck_ids() {
        let stuck = vec![SubTaskId::new(), SubTaskId::new()];
        let error = OrchestratorError::CycleDetected {
            stuck: stuck.clone(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("Cyclic dependency"));
        assert!(rendered.contains(&format!("{:?}", stuck[0])));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(OrchestratorError::Timeout(500).is_retryable());
        assert!(
            OrchestratorError::Core(CoreError::ProviderUnavailable("x".to_owned())).is_retryable()
        );
        assert!(!OrchestratorError::UnknownProvider("mail".to_owned()).is_retryable());
        assert!(
            !OrchestratorError::CycleDetected { stuck: Vec::new() }.is_retryable()
        );
    }
}
