//! Core types and traits for the conductor orchestration system.
//!
//! This crate provides the task and subtask data model, the base error
//! taxonomy, and the trait seams through which the orchestrator reaches
//! capability providers and message sources.

/// Error types and result definitions.
pub mod error;
/// Well-known provider keys and action names.
pub mod keys;
/// Trait definitions for capability providers and message sources.
pub mod traits;
/// Core data types for tasks, subtasks, results, and messages.
pub mod types;

pub use error::{Error, Result};
pub use traits::{CapabilityProvider, MessageSource};
pub use types::{
    ChatMessage, DeepAnalysis, FollowUpTask, InvocationOutcome, MessageAuthor, MessageChannel,
    MessagePage, MessageQuery, ResultData, SubTask, SubTaskId, SubTaskStatus, Task, TaskCategory,
    TaskId, TaskPriority, TaskStatus, UnifiedResult,
};
