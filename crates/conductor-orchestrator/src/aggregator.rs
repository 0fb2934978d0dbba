//! Result aggregation: merges per-subtask outcomes into one unified result.
//!
//! The merge shape follows the task category; any subtask payload carrying
//! an `analysis` object additionally feeds cross-cutting insights,
//! recommendations, metrics, and follow-up proposals. Partial subtask
//! failure is tolerated: the task succeeds iff at least one subtask did.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use conductor_core::keys::actions;
use conductor_core::types::{
    DeepAnalysis, FollowUpTask, ResultData, SubTask, SubTaskStatus, Task, TaskCategory,
    TaskPriority, UnifiedResult,
};

/// Fixed follow-up suggestions attached to every search result.
const SEARCH_SUGGESTIONS: &[&str] = &[
    "Narrow the search with a channel or sender filter",
    "Restrict the time range to reduce noise",
    "Ask for an analysis of the matching conversations",
];

/// Category-aware merger of subtask outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    /// Builds the unified result for a task whose subtasks have settled.
    #[must_use]
    pub fn aggregate(&self, task: &Task) -> UnifiedResult {
        let completed: Vec<&SubTask> = task
            .subtasks
            .iter()
            .filter(|sub| sub.status == SubTaskStatus::Completed)
            .collect();
        let success = !completed.is_empty();

        let (basic_results, mut summary) = match task.category {
            TaskCategory::Search => merge_search(&completed),
            TaskCategory::Analyze => merge_analyze(&completed),
            TaskCategory::Create => merge_create(&completed),
            TaskCategory::Chat
            | TaskCategory::Workflow
            | TaskCategory::Notification => merge_chat(&completed),
        };

        let mut recommendations = Vec::new();
        if task.category == TaskCategory::Search {
            recommendations.extend(SEARCH_SUGGESTIONS.iter().map(|&text| text.to_owned()));
        }
        if task.category == TaskCategory::Analyze {
            for sub in &completed {
                if let Some(list) = sub
                    .result
                    .as_ref()
                    .and_then(|payload| payload.get("recommendations"))
                    .and_then(Value::as_array)
                {
                    for entry in list {
                        if let Some(text) = entry.as_str() {
                            push_unique(&mut recommendations, text.to_owned());
                        }
                    }
                }
            }
        }

        let deep_analysis = extract_deep_analysis(&completed);
        let mut follow_up_tasks = Vec::new();
        if let Some(analysis) = &deep_analysis {
            for line in &analysis.recommendations {
                push_unique(&mut recommendations, line.clone());
            }
            follow_up_tasks.extend(propose_follow_ups(analysis));
        }

        if !success {
            let failures = task
                .subtasks
                .iter()
                .filter_map(|sub| sub.error.as_deref())
                .collect::<Vec<_>>()
                .join("; ");
            summary = format!("No subtask succeeded: {failures}");
        }

        UnifiedResult {
            success,
            data: ResultData {
                task_type: task.category,
                user_query: task.query.clone(),
                basic_results,
                deep_analysis,
            },
            summary,
            recommendations,
            follow_up_tasks,
        }
    }
}

fn merge_search(completed: &[&SubTask]) -> (Vec<Value>, String) {
    let sources: Vec<&SubTask> = completed
        .iter()
        .filter(|sub| sub.action == actions::SEARCH)
        .copied()
        .collect();
    let results: Vec<Value> = sources
        .iter()
        .map(|sub| {
            json!({
                "source": sub.provider,
                "data": sub.result.clone().unwrap_or(Value::Null),
            })
        })
        .collect();
    let summary = format!("Searched {} sources", sources.len());
    (results, summary)
}

/// The analyze subtask's payload is the analysis body, verbatim.
fn merge_analyze(completed: &[&SubTask]) -> (Vec<Value>, String) {
    let analysis = completed
        .iter()
        .find(|sub| sub.action == actions::ANALYZE)
        .and_then(|sub| sub.result.clone());
    match analysis {
        Some(payload) => (vec![payload], "Analysis complete".to_owned()),
        None => (
            completed
                .iter()
                .filter_map(|sub| sub.result.clone())
                .collect(),
            "Analysis produced no payload".to_owned(),
        ),
    }
}

/// The first subtask's payload is the created artifact.
fn merge_create(completed: &[&SubTask]) -> (Vec<Value>, String) {
    let artifact = completed.first().and_then(|sub| sub.result.clone());
    match artifact {
        Some(payload) => (vec![payload], "Created the requested artifact".to_owned()),
        None => (Vec::new(), "Nothing was created".to_owned()),
    }
}

fn merge_chat(completed: &[&SubTask]) -> (Vec<Value>, String) {
    let response = completed
        .iter()
        .filter_map(|sub| sub.result.as_ref())
        .find_map(|payload| {
            payload
                .get("response")
                .and_then(Value::as_str)
                .map(str::to_owned)
        });
    let results: Vec<Value> = completed
        .iter()
        .filter_map(|sub| sub.result.clone())
        .collect();
    let summary = response.unwrap_or_else(|| "Done".to_owned());
    (results, summary)
}

/// Pulls cross-cutting signals out of any `analysis` payload among the
/// outcomes.
fn extract_deep_analysis(completed: &[&SubTask]) -> Option<DeepAnalysis> {
    let analysis = completed
        .iter()
        .filter_map(|sub| sub.result.as_ref())
        .find_map(|payload| payload.get("analysis"))?;

    let mut insights = Vec::new();
    let mut recommendations = Vec::new();
    let mut key_metrics = BTreeMap::new();

    if let Some(sentiment) = analysis.get("sentiment").filter(|value| !value.is_null()) {
        let label = sentiment
            .get("classification")
            .and_then(Value::as_str)
            .unwrap_or("neutral");
        let score = sentiment.get("score").and_then(Value::as_f64).unwrap_or(0.0);
        insights.push(format!("Overall sentiment is {label} (score {score:.2})"));
        key_metrics.insert("sentiment_score".to_owned(), score);
        if let Some(confidence) = sentiment.get("confidence").and_then(Value::as_f64) {
            key_metrics.insert("sentiment_confidence".to_owned(), confidence);
        }
    }

    if let Some(tasks) = analysis.get("tasks").and_then(Value::as_array) {
        let urgent = tasks
            .iter()
            .filter(|item| item.get("priority").and_then(Value::as_str) == Some("urgent"))
            .count();
        insights.push(format!(
            "{} action items extracted ({urgent} urgent)",
            tasks.len()
        ));
        key_metrics.insert("task_count".to_owned(), tasks.len() as f64);
        key_metrics.insert("urgent_task_count".to_owned(), urgent as f64);
    }

    if let Some(meetings) = analysis.get("meetings").and_then(Value::as_array) {
        if !meetings.is_empty() {
            let productive = meetings
                .iter()
                .filter(|thread| {
                    thread.get("sentiment").and_then(Value::as_str) == Some("productive")
                })
                .count();
            insights.push(format!(
                "{productive} of {} detected meetings look productive",
                meetings.len()
            ));
            key_metrics.insert("meeting_count".to_owned(), meetings.len() as f64);
        }
    }

    if let Some(team) = analysis
        .get("team_insights")
        .filter(|value| !value.is_null())
    {
        if let Some(score) = team.get("collaboration_score").and_then(Value::as_f64) {
            insights.push(format!("Collaboration score is {score:.0}/100"));
            key_metrics.insert("collaboration_score".to_owned(), score);
        }
        if let Some(minutes) = team
            .get("metrics")
            .and_then(|metrics| metrics.get("avg_response_minutes"))
            .and_then(Value::as_f64)
        {
            key_metrics.insert("avg_response_minutes".to_owned(), minutes);
        }
        if let Some(list) = team.get("recommendations").and_then(Value::as_array) {
            for entry in list {
                let priority = entry
                    .get("priority")
                    .and_then(Value::as_str)
                    .unwrap_or("medium");
                if let Some(description) = entry.get("description").and_then(Value::as_str) {
                    push_unique(&mut recommendations, format!("[{priority}] {description}"));
                }
            }
        }
    }

    if let Some(millis) = analysis.get("processing_time_ms").and_then(Value::as_f64) {
        key_metrics.insert("processing_time_ms".to_owned(), millis);
    }

    Some(DeepAnalysis {
        insights,
        recommendations,
        key_metrics,
    })
}

/// Urgent extracted tasks warrant a create follow-up.
fn propose_follow_ups(analysis: &DeepAnalysis) -> Vec<FollowUpTask> {
    let urgent = analysis
        .key_metrics
        .get("urgent_task_count")
        .copied()
        .unwrap_or(0.0);
    if urgent > 0.0 {
        vec![FollowUpTask {
            category: TaskCategory::Create,
            description: format!("Create tracked issues for {urgent:.0} urgent action items"),
            priority: TaskPriority::High,
        }]
    } else {
        Vec::new()
    }
}

fn push_unique(list: &mut Vec<String>, entry: String) {
    if !list.contains(&entry) {
        list.push(entry);
    }
}
