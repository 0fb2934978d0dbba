//! Task-orchestration core: classify, plan, schedule, aggregate.
//!
//! A coordinator accepts a free-form user request, classifies it, expands it
//! into a dependency graph of subtasks bound to pluggable capability
//! providers, executes that graph with level-based parallelism, and
//! synthesizes one unified result.

/// Result aggregation by task category.
pub mod aggregator;
/// Execution and analysis configuration.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Intent classification from raw user text.
pub mod intent;
/// Orchestrator facade.
pub mod orchestrator;
/// Per-category subtask planning.
pub mod planner;
/// Capability-provider registry.
pub mod registry;
/// Dependency-level scheduling and concurrent execution.
pub mod scheduler;

pub use aggregator::ResultAggregator;
pub use config::{AnalysisConfig, ExecutionConfig, OrchestratorConfig};
pub use error::{OrchestratorError, Result};
pub use intent::{
    AnalysisDepth, AnalysisHints, ClassifierRules, Intent, IntentStrategy,
    KeywordIntentClassifier,
};
pub use orchestrator::Orchestrator;
pub use planner::TaskPlanner;
pub use registry::CapabilityRegistry;
pub use scheduler::DependencyScheduler;
