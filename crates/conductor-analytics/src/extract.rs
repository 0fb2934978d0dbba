//! Pattern- and heuristic-driven extraction of action items.
//!
//! A fixed ordered list of per-language patterns pulls candidate action
//! descriptions out of each message; urgency, time, and stakeholder signals
//! are scanned over the full source message rather than just the match.
//! Near-duplicates are merged before the list is returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use conductor_core::types::{ChatMessage, TaskPriority};

use crate::language::{Language, LanguageDetector};
use crate::lexicon::{Lexicon, PriorityWeights};

/// Minimum cleaned-description length; shorter matches are noise.
const MIN_DESCRIPTION_LEN: usize = 5;
/// Descriptions more similar than this are merged.
const DEDUP_SIMILARITY: f64 = 0.8;
/// Starting confidence before bonuses.
const BASE_CONFIDENCE: f64 = 0.5;
/// Bonus for a well-bounded description length.
const LENGTH_BONUS: f64 = 0.1;
/// Bonus for an explicit action verb.
const ACTION_VERB_BONUS: f64 = 0.15;
/// Bonus for a stakeholder reference.
const STAKEHOLDER_BONUS: f64 = 0.1;
/// Bonus for a time indicator.
const TIME_BONUS: f64 = 0.1;
/// Bonus for an urgency indicator.
const URGENCY_BONUS: f64 = 0.1;
/// Upper bound on extraction confidence.
const CONFIDENCE_CAP: f64 = 0.95;

/// Kind of work an extracted item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Plain actionable work.
    Action,
    /// A decision that must be made.
    Decision,
    /// A follow-up on earlier work.
    FollowUp,
    /// A reminder.
    Reminder,
    /// An open question.
    Question,
}

/// Coarse effort assessment for an extracted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskComplexity {
    /// Small, self-contained.
    Simple,
    /// Routine, some coordination.
    Moderate,
    /// Large or cross-cutting.
    Complex,
}

/// Lifecycle state inferred for an extracted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskItemStatus {
    /// Mentioned with no owner.
    Mentioned,
    /// An assignee was named.
    Assigned,
    /// The message says work is underway.
    InProgress,
    /// The message says work is blocked.
    Blocked,
}

/// Reference back to the message an item was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    /// Source message id.
    pub message_id: String,
    /// Source message author name.
    pub author: String,
    /// Source channel name.
    pub channel: String,
    /// Source message timestamp.
    pub timestamp: DateTime<Utc>,
}

/// One extracted action item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskItem {
    /// Unique identifier.
    pub id: Uuid,
    /// Cleaned action description.
    pub description: String,
    /// Assignee pulled from the first `@mention`, if any.
    pub assignee: Option<String>,
    /// Derived priority.
    pub priority: TaskPriority,
    /// Raw deadline phrase found in the source message, if any.
    pub deadline: Option<String>,
    /// Inferred lifecycle state.
    pub status: TaskItemStatus,
    /// Extraction confidence in 0..1.
    pub confidence: f64,
    /// Kind of work.
    pub task_type: TaskType,
    /// Coarse effort assessment.
    pub complexity: TaskComplexity,
    /// Stakeholders: mentions, the author, and role keywords.
    pub stakeholders: Vec<String>,
    /// Source-message reference.
    pub source: MessageRef,
}

/// Pattern-driven action-item extractor.
#[derive(Debug, Clone, Default)]
pub struct TaskExtractor {
    #[allow(dead_code, reason = "retained in constructor/state; extraction currently uses Lexicon associated fns")]
    lexicon: Lexicon,
    detector: LanguageDetector,
    weights: PriorityWeights,
}

impl TaskExtractor {
    /// Creates an extractor over a custom lexicon and priority weights.
    #[must_use]
    pub fn new(lexicon: Lexicon, weights: PriorityWeights) -> Self {
        Self {
            lexicon,
            detector: LanguageDetector,
            weights,
        }
    }

    /// Extracts and deduplicates action items from a message set.
    ///
    /// Survivors are sorted by priority tier, then confidence, descending.
    #[must_use]
    pub fn extract(&self, messages: &[ChatMessage]) -> Vec<TaskItem> {
        let mut items = Vec::new();
        for message in messages {
            items.extend(self.extract_from_message(message));
        }
        let mut deduped = dedupe(items);
        deduped.sort_by(|left, right| {
            right
                .priority
                .cmp(&left.priority)
                .then_with(|| {
                    right
                        .confidence
                        .partial_cmp(&left.confidence)
                        .unwrap_or(core::cmp::Ordering::Equal)
                })
        });
        deduped
    }

    /// Extracts candidate items from one message.
    #[must_use]
    pub fn extract_from_message(&self, message: &ChatMessage) -> Vec<TaskItem> {
        let detection = self.detector.detect(&message.text);
        let patterns: Vec<&regex::Regex> = match detection.language {
            Language::En => Lexicon::task_patterns_en().iter().collect(),
            Language::Zh => Lexicon::task_patterns_zh().iter().collect(),
            Language::Mixed => Lexicon::task_patterns_en()
                .iter()
                .chain(Lexicon::task_patterns_zh())
                .collect(),
        };

        let mut items = Vec::new();
        for pattern in patterns {
            for captures in pattern.captures_iter(&message.text) {
                let Some(raw) = captures.get(1) else { continue };
                let description = clean_description(raw.as_str());
                if description.chars().count() < MIN_DESCRIPTION_LEN {
                    continue;
                }
                items.push(self.build_item(description, message));
            }
        }
        items
    }

    fn build_item(&self, description: String, message: &ChatMessage) -> TaskItem {
        let text = &message.text;
        let urgency_hits = Lexicon::urgency_hits(text);
        let time_indicator = Lexicon::time_indicator(text);
        let task_type = classify_task_type(&description);
        let stakeholders = self.collect_stakeholders(message);
        let assignee = first_mention(text);

        let priority = self.score_priority(&urgency_hits, text, task_type);
        let confidence = self.score_confidence(
            &description,
            &stakeholders,
            time_indicator.is_some(),
            !urgency_hits.is_empty(),
        );

        TaskItem {
            id: Uuid::new_v4(),
            description: description.clone(),
            assignee: assignee.clone(),
            priority,
            deadline: time_indicator.map(str::to_owned),
            status: infer_status(text, assignee.is_some()),
            confidence,
            task_type,
            complexity: self.assess_complexity(&description),
            stakeholders,
            source: MessageRef {
                message_id: message.id.clone(),
                author: message.author.name.clone(),
                channel: message.channel.name.clone(),
                timestamp: message.timestamp,
            },
        }
    }

    /// Point-score priority derivation; weights are named and overridable.
    fn score_priority(
        &self,
        urgency_hits: &[&str],
        text: &str,
        task_type: TaskType,
    ) -> TaskPriority {
        let weights = self.weights;
        let mut score = weights.baseline;
        score += weights.urgency * urgency_hits.len() as i32;
        if Lexicon::has_critical_term(text) {
            score += weights.critical_bonus;
        }
        if Lexicon::has_same_day_term(text) {
            score += weights.same_day;
        } else if Lexicon::has_next_day_term(text) {
            score += weights.next_day;
        }
        if task_type == TaskType::Decision {
            score += weights.decision;
        }

        if score >= weights.urgent_threshold {
            TaskPriority::Urgent
        } else if score >= weights.high_threshold {
            TaskPriority::High
        } else if score >= weights.medium_threshold {
            TaskPriority::Medium
        } else {
            TaskPriority::Low
        }
    }

    fn score_confidence(
        &self,
        description: &str,
        stakeholders: &[String],
        has_time: bool,
        has_urgency: bool,
    ) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        let len = description.chars().count();
        if (10..=80).contains(&len) {
            confidence += LENGTH_BONUS;
        }
        let has_verb = description
            .to_lowercase()
            .split_whitespace()
            .any(Lexicon::is_action_verb);
        if has_verb {
            confidence += ACTION_VERB_BONUS;
        }
        if !stakeholders.is_empty() {
            confidence += STAKEHOLDER_BONUS;
        }
        if has_time {
            confidence += TIME_BONUS;
        }
        if has_urgency {
            confidence += URGENCY_BONUS;
        }
        confidence.min(CONFIDENCE_CAP)
    }

    fn assess_complexity(&self, description: &str) -> TaskComplexity {
        if Lexicon::has_complex_term(description) {
            return TaskComplexity::Complex;
        }
        if Lexicon::has_simple_term(description) {
            return TaskComplexity::Simple;
        }
        // No keyword hit: fall back to size thresholds.
        let tokens = description.split_whitespace().count();
        let len = description.chars().count();
        if tokens > 12 || len > 80 {
            TaskComplexity::Complex
        } else if tokens > 6 || len > 40 {
            TaskComplexity::Moderate
        } else {
            TaskComplexity::Simple
        }
    }

    fn collect_stakeholders(&self, message: &ChatMessage) -> Vec<String> {
        let mut stakeholders = Vec::new();
        if let Some(pattern) = Lexicon::mention_pattern() {
            for captures in pattern.captures_iter(&message.text) {
                if let Some(name) = captures.get(1) {
                    let name = name.as_str().to_owned();
                    if !stakeholders.contains(&name) {
                        stakeholders.push(name);
                    }
                }
            }
        }
        if !stakeholders.contains(&message.author.name) {
            stakeholders.push(message.author.name.clone());
        }
        for token in message.text.to_lowercase().split_whitespace() {
            let token = token.trim_matches(|ch: char| !ch.is_alphanumeric());
            if Lexicon::is_role_term(token) {
                let token = token.to_owned();
                if !stakeholders.contains(&token) {
                    stakeholders.push(token);
                }
            }
        }
        stakeholders
    }
}

fn classify_task_type(description: &str) -> TaskType {
    if Lexicon::has_decision_term(description) {
        TaskType::Decision
    } else if Lexicon::has_follow_up_term(description) {
        TaskType::FollowUp
    } else if Lexicon::has_reminder_term(description) {
        TaskType::Reminder
    } else if Lexicon::has_question_term(description) {
        TaskType::Question
    } else {
        TaskType::Action
    }
}

fn infer_status(text: &str, has_assignee: bool) -> TaskItemStatus {
    let lower = text.to_lowercase();
    if lower.contains("blocked") || lower.contains("stuck on") {
        TaskItemStatus::Blocked
    } else if lower.contains("working on") || lower.contains("in progress") {
        TaskItemStatus::InProgress
    } else if has_assignee {
        TaskItemStatus::Assigned
    } else {
        TaskItemStatus::Mentioned
    }
}

fn first_mention(text: &str) -> Option<String> {
    Lexicon::mention_pattern()
        .and_then(|pattern| pattern.captures(text))
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str().to_owned())
}

fn clean_description(raw: &str) -> String {
    let collapsed: Vec<&str> = raw.split_whitespace().collect();
    collapsed
        .join(" ")
        .trim_matches(|ch: char| ch.is_ascii_punctuation() && ch != '@')
        .to_owned()
}

/// Positional character-overlap similarity between two descriptions.
fn similarity(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.to_lowercase().chars().collect();
    let right: Vec<char> = right.to_lowercase().chars().collect();
    let longest = left.len().max(right.len());
    if longest == 0 {
        return 1.0;
    }
    let matching = left
        .iter()
        .zip(right.iter())
        .filter(|(a, b)| a == b)
        .count();
    matching as f64 / longest as f64
}

/// Merges near-duplicate items; the higher-priority, higher-confidence copy
/// survives and absorbs a missing assignee from the other.
fn dedupe(items: Vec<TaskItem>) -> Vec<TaskItem> {
    let mut survivors: Vec<TaskItem> = Vec::new();
    for item in items {
        let duplicate = survivors
            .iter_mut()
            .find(|kept| similarity(&kept.description, &item.description) > DEDUP_SIMILARITY);
        match duplicate {
            Some(kept) => {
                let stronger = (item.priority, item.confidence) > (kept.priority, kept.confidence);
                if stronger {
                    let fallback_assignee = kept.assignee.clone();
                    *kept = item;
                    if kept.assignee.is_none() {
                        kept.assignee = fallback_assignee;
                    }
                } else if kept.assignee.is_none() {
                    kept.assignee = item.assignee;
                }
            }
            None => survivors.push(item),
        }
    }
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use conductor_core::types::{MessageAuthor, MessageChannel};

    fn message(id: &str, author: &str, text: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_owned(),
            text: text.to_owned(),
            author: MessageAuthor {
                id: author.to_lowercase(),
                name: author.to_owned(),
            },
            channel: MessageChannel {
                id: "c1".to_owned(),
                name: "general".to_owned(),
            },
            timestamp: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).single().unwrap_or_default(),
        }
    }

    #[test]
    fn test_extracts_assigned_same_day_task() {
        let extractor = TaskExtractor::default();
        let items = extractor.extract(&[message(
            "m1",
            "Bob",
            "We need @alice to finish the report today",
        )]);

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.assignee.as_deref(), Some("alice"));
        assert_eq!(item.deadline.as_deref(), Some("today"));
        assert!(
            item.priority >= TaskPriority::High,
            "same-day indicator must raise priority to at least high, got {:?}",
            item.priority
        );
        assert_eq!(item.status, TaskItemStatus::Assigned);
        assert!(item.description.contains("finish the report"));
    }

    #[test]
    fn test_short_matches_rejected() {
        let extractor = TaskExtractor::default();
        let items = extractor.extract(&[message("m1", "Bob", "we must go.")]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = TaskExtractor::default();
        let messages = vec![
            message("m1", "Bob", "need to review the deploy checklist tomorrow"),
            message("m2", "Eve", "please update the roadmap this week"),
            message("m3", "Bob", "We need to review the deploy checklist tomorrow!"),
        ];

        let first = extractor.extract(&messages);
        let second = extractor.extract(&messages);

        assert_eq!(first.len(), second.len());
        let first_descriptions: Vec<&str> =
            first.iter().map(|item| item.description.as_str()).collect();
        let second_descriptions: Vec<&str> =
            second.iter().map(|item| item.description.as_str()).collect();
        assert_eq!(first_descriptions, second_descriptions);
    }

    #[test]
    fn test_near_duplicates_merge() {
        let extractor = TaskExtractor::default();
        let messages = vec![
            message("m1", "Bob", "need to send the weekly summary to the team"),
            message("m2", "Eve", "we need to send the weekly summary to the team"),
        ];
        let items = extractor.extract(&messages);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_urgency_raises_priority() {
        let extractor = TaskExtractor::default();
        let calm = extractor.extract(&[message("m1", "Bob", "need to refresh the docs sometime")]);
        let urgent = extractor.extract(&[message(
            "m2",
            "Bob",
            "URGENT: need to fix the critical login outage today asap",
        )]);

        assert_eq!(calm[0].priority, TaskPriority::Medium);
        assert_eq!(urgent[0].priority, TaskPriority::Urgent);
    }

    #[test]
    fn test_decision_type_classified() {
        let extractor = TaskExtractor::default();
        let items = extractor.extract(&[message(
            "m1",
            "Bob",
            "we should decide on the storage backend",
        )]);
        assert_eq!(items[0].task_type, TaskType::Decision);
    }

    #[test]
    fn test_confidence_bounds() {
        let extractor = TaskExtractor::default();
        let items = extractor.extract(&[message(
            "m1",
            "Bob",
            "URGENT need @alice to finish the report today",
        )]);
        let confidence = items[0].confidence;
        assert!(confidence >= BASE_CONFIDENCE);
        assert!(confidence <= CONFIDENCE_CAP);
    }

    #[test]
    fn test_stakeholders_include_author_and_mentions() {
        let extractor = TaskExtractor::default();
        let items = extractor.extract(&[message(
            "m1",
            "Bob",
            "need @alice to sync with the team lead",
        )]);
        let stakeholders = &items[0].stakeholders;
        assert!(stakeholders.contains(&"alice".to_owned()));
        assert!(stakeholders.contains(&"Bob".to_owned()));
        assert!(stakeholders.contains(&"team".to_owned()));
    }

    #[test]
    fn test_similarity_ratio() {
        assert!(similarity("send the report", "send the report") > 0.99);
        assert!(similarity("send the report", "send the reports") > 0.8);
        assert!(similarity("send the report", "totally different") < 0.3);
    }
}
