//! Task planning: expands a classified task into provider-bound subtasks.
//!
//! Each category produces a fixed shape of subtasks with their dependencies
//! threaded by id. Planning never fails; an unrecognized category falls back
//! to the chat shape.

use serde_json::json;

use conductor_core::keys::{self, actions};
use conductor_core::types::{SubTask, Task, TaskCategory};

use crate::intent::{AnalysisDepth, Intent};

/// Query terms that select the messaging source for a search.
const MESSAGING_SOURCE_TERMS: &[&str] = &["message", "chat", "slack", "conversation", "channel"];
/// Query terms that select the mail source.
const MAIL_SOURCE_TERMS: &[&str] = &["mail", "email", "inbox"];
/// Query terms that select the file-storage source.
const FILE_SOURCE_TERMS: &[&str] = &["file", "document", "doc", "drive", "spreadsheet"];
/// Query terms that select the issue-tracker source.
const ISSUE_SOURCE_TERMS: &[&str] = &["issue", "ticket", "bug", "jira"];

/// Expands classified tasks into subtask graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskPlanner;

impl TaskPlanner {
    /// Populates `task.subtasks` for its category and intent hints.
    pub fn plan(&self, task: &mut Task, intent: &Intent) {
        let mut subtasks = match task.category {
            TaskCategory::Search => Self::plan_search(task),
            TaskCategory::Create => vec![Self::plan_create_step(task)],
            TaskCategory::Analyze => Self::plan_analyze(task, intent),
            TaskCategory::Workflow => Self::plan_workflow(task),
            TaskCategory::Chat | TaskCategory::Notification => vec![Self::plan_chat_step(task)],
        };

        if intent.hints.needs_deep_analysis {
            subtasks.push(Self::plan_deep_analysis(task, intent));
        }

        tracing::debug!(
            category = ?task.category,
            subtasks = subtasks.len(),
            "planned task"
        );
        task.subtasks = subtasks;
    }

    /// One search subtask per matched source, or all sources when nothing
    /// matched, followed by one merge subtask depending on all of them.
    fn plan_search(task: &Task) -> Vec<SubTask> {
        let lower = task.query.to_lowercase();
        let source_rules = [
            (MESSAGING_SOURCE_TERMS, keys::MESSAGING),
            (MAIL_SOURCE_TERMS, keys::MAIL),
            (FILE_SOURCE_TERMS, keys::FILES),
            (ISSUE_SOURCE_TERMS, keys::ISSUES),
        ];

        let mut sources: Vec<&str> = source_rules
            .iter()
            .filter(|(terms, _)| terms.iter().any(|term| lower.contains(term)))
            .map(|(_, key)| *key)
            .collect();
        if sources.is_empty() {
            sources = source_rules.iter().map(|(_, key)| *key).collect();
        }

        let mut subtasks: Vec<SubTask> = sources
            .into_iter()
            .map(|source| {
                SubTask::new(task.id, source, actions::SEARCH)
                    .with_params(json!({ "query": task.query }))
            })
            .collect();

        let all_ids = subtasks.iter().map(|sub| sub.id).collect();
        subtasks.push(
            SubTask::new(task.id, keys::CHAT, actions::MERGE_RESULTS)
                .with_params(json!({ "query": task.query }))
                .with_dependencies(all_ids),
        );
        subtasks
    }

    /// A single creation subtask routed by keyword to the matching provider.
    fn plan_create_step(task: &Task) -> SubTask {
        let lower = task.query.to_lowercase();
        let (provider, action) = if ISSUE_SOURCE_TERMS.iter().any(|term| lower.contains(term)) {
            (keys::ISSUES, actions::CREATE_ISSUE)
        } else if MAIL_SOURCE_TERMS.iter().any(|term| lower.contains(term)) {
            (keys::MAIL, actions::DRAFT_EMAIL)
        } else {
            (keys::CHAT, actions::CREATE)
        };
        SubTask::new(task.id, provider, action).with_params(json!({ "request": task.query }))
    }

    /// Two independent collect subtasks followed by one analyze subtask
    /// depending on both.
    fn plan_analyze(task: &Task, intent: &Intent) -> Vec<SubTask> {
        let timeframe = intent.hints.timeframe_days;
        let collect_messages = SubTask::new(task.id, keys::MESSAGING, actions::COLLECT_HISTORY)
            .with_params(json!({ "context_id": task.context_id, "timeframe_days": timeframe }));
        let collect_mail = SubTask::new(task.id, keys::MAIL, actions::COLLECT_HISTORY)
            .with_params(json!({ "context_id": task.context_id, "timeframe_days": timeframe }));
        let analyze = SubTask::new(task.id, keys::CHAT, actions::ANALYZE)
            .with_params(json!({ "request": task.query }))
            .with_dependencies(vec![collect_messages.id, collect_mail.id]);
        vec![collect_messages, collect_mail, analyze]
    }

    /// A create step followed by a notify step depending on it.
    fn plan_workflow(task: &Task) -> Vec<SubTask> {
        let create = Self::plan_create_step(task);
        let notify = SubTask::new(task.id, keys::NOTIFICATIONS, actions::NOTIFY)
            .with_params(json!({ "request": task.query }))
            .with_dependencies(vec![create.id]);
        vec![create, notify]
    }

    fn plan_chat_step(task: &Task) -> SubTask {
        SubTask::new(task.id, keys::CHAT, actions::CHAT)
            .with_params(json!({ "message": task.query }))
    }

    /// Independent messaging-analytics subtask; parameters carry the
    /// timeframe and which sub-analyses to run, straight from the hints.
    fn plan_deep_analysis(task: &Task, intent: &Intent) -> SubTask {
        let hints = &intent.hints;
        let comprehensive = hints.depth == AnalysisDepth::Comprehensive;
        SubTask::new(task.id, keys::MESSAGING, actions::ANALYZE_CONVERSATIONS).with_params(json!({
            "context_id": task.context_id,
            "timeframe_days": hints.timeframe_days,
            "include_sentiment": hints.sentiment_related || comprehensive,
            "include_tasks": hints.task_related || comprehensive,
            "include_meetings": hints.meeting_related || comprehensive,
            "include_team_insights": comprehensive,
        }))
    }
}
