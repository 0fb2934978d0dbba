use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubTaskId(Uuid);

impl SubTaskId {
    /// Creates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubTaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SubTaskId {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Category assigned to a task by the intent classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Conversational request answered by the generic chat capability.
    Chat,
    /// Query across one or more data sources.
    Search,
    /// Creation of an artifact (issue, draft, document).
    Create,
    /// Analysis over collected history.
    Analyze,
    /// Multi-step create-then-notify workflow.
    Workflow,
    /// Outbound notification.
    Notification,
}

/// Priority level for a task or extracted action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Default priority.
    Medium,
    /// Should be handled soon.
    High,
    /// Needs immediate attention.
    Urgent,
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Accepted, not yet planned.
    Pending,
    /// Subtask graph is being built.
    Planning,
    /// Subtasks are running.
    Executing,
    /// All done; result is available.
    Completed,
    /// Aborted or no subtask succeeded.
    Failed,
}

impl TaskStatus {
    /// Whether this state admits no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Subtask lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubTaskStatus {
    /// Waiting for its dependency level.
    Pending,
    /// Invocation in flight.
    Executing,
    /// Provider returned success.
    Completed,
    /// Provider returned an error; recorded, never propagated to siblings.
    Failed,
}

/// One user request, decomposed into subtasks and carried through to one
/// unified result. Owned exclusively by the orchestrator; terminal once
/// `Completed` or `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,
    /// Category assigned by the intent classifier.
    pub category: TaskCategory,
    /// Priority level.
    pub priority: TaskPriority,
    /// Originating user text.
    pub query: String,
    /// Identifier of the conversation or workspace this request belongs to.
    pub context_id: String,
    /// Identifier of the requesting user.
    pub user_id: String,
    /// Planned units of work, in planning order.
    pub subtasks: Vec<SubTask>,
    /// Lifecycle state.
    pub status: TaskStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last state-transition timestamp.
    pub updated_at: DateTime<Utc>,
    /// Final aggregated payload, present once completed.
    pub result: Option<Value>,
    /// Fatal error description, present once failed.
    pub error: Option<String>,
}

impl Task {
    /// Creates a pending task for the given request.
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        context_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            category: TaskCategory::Chat,
            priority: TaskPriority::Medium,
            query: query.into(),
            context_id: context_id.into(),
            user_id: user_id.into(),
            subtasks: Vec::new(),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Transitions to a new lifecycle state, refreshing `updated_at`.
    pub fn transition(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Looks up a subtask by id.
    #[must_use]
    pub fn subtask(&self, id: SubTaskId) -> Option<&SubTask> {
        self.subtasks.iter().find(|sub| sub.id == id)
    }
}

/// One unit of work bound to a capability provider and an action, with
/// declared dependencies on sibling subtasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTask {
    /// Unique identifier.
    pub id: SubTaskId,
    /// Parent task identifier.
    pub task_id: TaskId,
    /// Capability-provider key this subtask is bound to.
    pub provider: String,
    /// Action name within the provider.
    pub action: String,
    /// Parameter bag passed to the provider.
    pub params: Value,
    /// Sibling subtasks that must settle first. Must be acyclic within a task.
    pub depends_on: Vec<SubTaskId>,
    /// Lifecycle state.
    pub status: SubTaskStatus,
    /// Provider payload on success.
    pub result: Option<Value>,
    /// Provider error on failure.
    pub error: Option<String>,
}

impl SubTask {
    /// Creates a pending subtask bound to a provider and action.
    #[must_use]
    pub fn new(task_id: TaskId, provider: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: SubTaskId::new(),
            task_id,
            provider: provider.into(),
            action: action.into(),
            params: Value::Null,
            depends_on: Vec::new(),
            status: SubTaskStatus::Pending,
            result: None,
            error: None,
        }
    }

    /// Sets the parameter bag.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Declares dependencies on sibling subtasks.
    #[must_use]
    pub fn with_dependencies(mut self, depends_on: Vec<SubTaskId>) -> Self {
        self.depends_on = depends_on;
        self
    }

    /// Records a successful provider outcome.
    pub fn record_success(&mut self, data: Value) {
        self.status = SubTaskStatus::Completed;
        self.result = Some(data);
    }

    /// Records a failed provider outcome.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.status = SubTaskStatus::Failed;
        self.error = Some(error.into());
    }
}

/// Uniform return shape of a capability invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationOutcome {
    /// Whether the provider completed the action.
    pub success: bool,
    /// Provider payload; `Null` when nothing was produced.
    pub data: Value,
    /// Error description when `success` is false.
    pub error: Option<String>,
}

impl InvocationOutcome {
    /// Builds a successful outcome around a payload.
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    /// Builds a failed outcome with an error description.
    #[must_use]
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(error.into()),
        }
    }
}

/// Caller-facing result of one orchestrated task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedResult {
    /// True iff at least one subtask succeeded.
    pub success: bool,
    /// Structured result body.
    pub data: ResultData,
    /// Best-effort human-readable summary.
    pub summary: String,
    /// Flattened, deduplicated recommendations.
    pub recommendations: Vec<String>,
    /// Proposed follow-up tasks.
    pub follow_up_tasks: Vec<FollowUpTask>,
}

/// Structured body of a [`UnifiedResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultData {
    /// Category the originating task was classified as.
    pub task_type: TaskCategory,
    /// Originating user text.
    pub user_query: String,
    /// Per-subtask payloads that contributed to the result.
    pub basic_results: Vec<Value>,
    /// Present when an analytics payload was found among the outcomes.
    pub deep_analysis: Option<DeepAnalysis>,
}

/// Cross-cutting insight bundle extracted from analytics payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepAnalysis {
    /// Human-readable insight strings.
    pub insights: Vec<String>,
    /// Flattened recommendation strings, prefixed by priority.
    pub recommendations: Vec<String>,
    /// Flat key/value metrics map.
    pub key_metrics: BTreeMap<String, f64>,
}

/// A task the aggregator proposes as a follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpTask {
    /// Suggested category.
    pub category: TaskCategory,
    /// Suggested request text.
    pub description: String,
    /// Suggested priority.
    pub priority: TaskPriority,
}

/// Author of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    /// Stable author identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Channel a chat message was posted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChannel {
    /// Stable channel identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// One conversational message as delivered by a message source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Stable message identifier.
    pub id: String,
    /// Message body.
    pub text: String,
    /// Author of the message.
    pub author: MessageAuthor,
    /// Channel the message was posted in.
    pub channel: MessageChannel,
    /// Posting time.
    pub timestamp: DateTime<Utc>,
}

/// Filter bundle for a message-source load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageQuery {
    /// Maximum number of messages to return; `None` means source default.
    pub limit: Option<usize>,
    /// Exclude messages older than this instant.
    pub start_date: Option<DateTime<Utc>>,
    /// Restrict to one channel id.
    pub channel: Option<String>,
}

impl MessageQuery {
    /// Creates an unrestricted query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of returned messages.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Excludes messages older than the given instant.
    #[must_use]
    pub fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Restricts results to one channel id.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// Page of messages returned by a message source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePage {
    /// Matching messages, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Total matches before the limit was applied.
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_builder_and_transition() {
        let mut task = Task::new("summarize the week", "ctx-1", "user-1")
            .with_category(TaskCategory::Analyze)
            .with_priority(TaskPriority::High);

        assert_eq!(task.category, TaskCategory::Analyze);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.status.is_terminal());

        task.transition(TaskStatus::Completed);
        assert!(task.status.is_terminal());
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn test_subtask_records_outcomes() {
        let task_id = TaskId::new();
        let mut sub = SubTask::new(task_id, "messaging", "search")
            .with_params(json!({"query": "report"}));

        assert_eq!(sub.status, SubTaskStatus::Pending);
        sub.record_success(json!({"hits": 3}));
        assert_eq!(sub.status, SubTaskStatus::Completed);
        assert!(sub.error.is_none());

        let mut failed = SubTask::new(task_id, "mail", "search");
        failed.record_failure("mail backend offline");
        assert_eq!(failed.status, SubTaskStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("mail backend offline"));
    }

    #[test]
    fn test_invocation_outcome_constructors() {
        let ok = InvocationOutcome::ok(json!({"created": true}));
        assert!(ok.success);
        assert!(ok.error.is_none());

        let err = InvocationOutcome::err("boom");
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("boom"));
        assert!(err.data.is_null());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(TaskPriority::Urgent > TaskPriority::High);
        assert!(TaskPriority::High > TaskPriority::Medium);
        assert!(TaskPriority::Medium > TaskPriority::Low);
    }

    #[test]
    fn test_message_query_builder() {
        let query = MessageQuery::new()
            .with_limit(50)
            .with_channel("general");
        assert_eq!(query.limit, Some(50));
        assert_eq!(query.channel.as_deref(), Some("general"));
        assert!(query.start_date.is_none());
    }
}
