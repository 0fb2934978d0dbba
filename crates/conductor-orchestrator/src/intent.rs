//! Intent classification from raw user text.
//!
//! Classification is keyword-membership based and inherently approximate;
//! the keyword tables are configurable data on [`ClassifierRules`], not
//! hard-coded control flow, and the whole stage sits behind the
//! [`IntentStrategy`] seam so it can be swapped out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use conductor_core::types::TaskCategory;

/// Analysis depth requested by the user's phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    /// Quick pass.
    Basic,
    /// Default depth.
    Deep,
    /// Everything the cascade offers.
    Comprehensive,
}

/// Hint bundle attached to a classified intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisHints {
    /// Whether the planner should append the messaging-analytics subtask.
    pub needs_deep_analysis: bool,
    /// Requested analysis depth.
    pub depth: AnalysisDepth,
    /// The request mentions action items or todos.
    pub task_related: bool,
    /// The request mentions mood or sentiment.
    pub sentiment_related: bool,
    /// The request mentions meetings or discussions.
    pub meeting_related: bool,
    /// Lookback window in days.
    pub timeframe_days: u32,
}

/// Result of intent classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Assigned task category.
    pub category: TaskCategory,
    /// Analysis hint bundle.
    pub hints: AnalysisHints,
}

/// Trait for intent classification strategies.
#[async_trait]
pub trait IntentStrategy: Send + Sync {
    /// Classifies raw user text. Never fails; unrecognized intent defaults
    /// to the chat category.
    async fn classify(&self, request: &str) -> Intent;
}

/// Keyword tables driving the default classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRules {
    /// Keywords that select the search category.
    pub search_keywords: Vec<String>,
    /// Keywords that select the create category.
    pub create_keywords: Vec<String>,
    /// Keywords that select the analyze category.
    pub analyze_keywords: Vec<String>,
    /// Keywords that select the workflow category.
    pub workflow_keywords: Vec<String>,
    /// Keywords that force comprehensive depth.
    pub deep_keywords: Vec<String>,
    /// Keywords that force basic depth.
    pub simple_keywords: Vec<String>,
    /// Keywords that flag the request as task-related.
    pub task_keywords: Vec<String>,
    /// Keywords that flag the request as sentiment-related.
    pub sentiment_keywords: Vec<String>,
    /// Keywords that flag the request as meeting-related.
    pub meeting_keywords: Vec<String>,
    /// Relative-time phrases mapped to lookback windows in days; first
    /// match wins.
    pub timeframes: Vec<(String, u32)>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|&word| word.to_owned()).collect()
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            search_keywords: owned(&["search", "find", "look for", "look up", "locate", "where"]),
            create_keywords: owned(&["create", "make", "draft", "open a", "file a", "write a"]),
            analyze_keywords: owned(&[
                "analyze",
                "analysis",
                "summarize",
                "summary",
                "insight",
                "report on",
                "how is",
                "how are",
            ]),
            workflow_keywords: owned(&["workflow", "and then notify", "then tell", "pipeline"]),
            deep_keywords: owned(&["deep", "comprehensive", "thorough", "detailed", "in depth"]),
            simple_keywords: owned(&["simple", "quick", "brief", "short"]),
            task_keywords: owned(&["task", "todo", "action item", "assignment", "deadline"]),
            sentiment_keywords: owned(&["sentiment", "mood", "morale", "feeling", "tone"]),
            meeting_keywords: owned(&["meeting", "standup", "discussion", "sync", "call"]),
            timeframes: vec![
                ("today".to_owned(), 1),
                ("yesterday".to_owned(), 2),
                ("this week".to_owned(), 7),
                ("last week".to_owned(), 14),
                ("this month".to_owned(), 30),
            ],
        }
    }
}

/// Keyword-membership intent classifier.
///
/// Category is the first matching rule among the search, create, analyze,
/// and workflow keyword sets, defaulting to chat.
#[derive(Debug, Clone)]
pub struct KeywordIntentClassifier {
    rules: ClassifierRules,
    default_timeframe_days: u32,
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self {
            rules: ClassifierRules::default(),
            default_timeframe_days: 7,
        }
    }
}

impl KeywordIntentClassifier {
    /// Creates a classifier over custom rules.
    #[must_use]
    pub fn new(rules: ClassifierRules, default_timeframe_days: u32) -> Self {
        Self {
            rules,
            default_timeframe_days,
        }
    }

    fn detect_category(&self, request: &str) -> TaskCategory {
        let rules = [
            (&self.rules.search_keywords, TaskCategory::Search),
            (&self.rules.create_keywords, TaskCategory::Create),
            (&self.rules.analyze_keywords, TaskCategory::Analyze),
            (&self.rules.workflow_keywords, TaskCategory::Workflow),
        ];
        for (keywords, category) in rules {
            if keywords.iter().any(|keyword| request.contains(keyword)) {
                return category;
            }
        }
        TaskCategory::Chat
    }

    fn detect_depth(&self, request: &str) -> AnalysisDepth {
        if self
            .rules
            .deep_keywords
            .iter()
            .any(|keyword| request.contains(keyword))
        {
            AnalysisDepth::Comprehensive
        } else if self
            .rules
            .simple_keywords
            .iter()
            .any(|keyword| request.contains(keyword))
        {
            AnalysisDepth::Basic
        } else {
            AnalysisDepth::Deep
        }
    }

    fn detect_timeframe(&self, request: &str) -> u32 {
        self.rules
            .timeframes
            .iter()
            .find(|(phrase, _)| request.contains(phrase))
            .map_or(self.default_timeframe_days, |(_, days)| *days)
    }
}

#[async_trait]
impl IntentStrategy for KeywordIntentClassifier {
    async fn classify(&self, request: &str) -> Intent {
        let lower = request.to_lowercase();

        let category = self.detect_category(&lower);
        let depth = self.detect_depth(&lower);
        let task_related = self
            .rules
            .task_keywords
            .iter()
            .any(|keyword| lower.contains(keyword));
        let sentiment_related = self
            .rules
            .sentiment_keywords
            .iter()
            .any(|keyword| lower.contains(keyword));
        let meeting_related = self
            .rules
            .meeting_keywords
            .iter()
            .any(|keyword| lower.contains(keyword));
        let needs_deep_analysis = task_related
            || sentiment_related
            || meeting_related
            || depth == AnalysisDepth::Comprehensive;

        let intent = Intent {
            category,
            hints: AnalysisHints {
                needs_deep_analysis,
                depth,
                task_related,
                sentiment_related,
                meeting_related,
                timeframe_days: self.detect_timeframe(&lower),
            },
        };
        tracing::debug!(category = ?intent.category, depth = ?intent.hints.depth, "classified request");
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_category_wins_first() {
        let classifier = KeywordIntentClassifier::default();
        let intent = classifier.classify("find the budget spreadsheet").await;
        assert_eq!(intent.category, TaskCategory::Search);
    }

    #[tokio::test]
    async fn test_unrecognized_defaults_to_chat() {
        let classifier = KeywordIntentClassifier::default();
        let intent = classifier.classify("hello there").await;
        assert_eq!(intent.category, TaskCategory::Chat);
        assert_eq!(intent.hints.depth, AnalysisDepth::Deep);
        assert_eq!(intent.hints.timeframe_days, 7);
    }

    #[tokio::test]
    async fn test_depth_keywords() {
        let classifier = KeywordIntentClassifier::default();
        let deep = classifier
            .classify("give me a comprehensive analysis of team mood")
            .await;
        assert_eq!(deep.hints.depth, AnalysisDepth::Comprehensive);
        assert!(deep.hints.needs_deep_analysis);

        let quick = classifier.classify("quick summary of the channel").await;
        assert_eq!(quick.hints.depth, AnalysisDepth::Basic);
    }

    #[tokio::test]
    async fn test_timeframe_overrides() {
        let classifier = KeywordIntentClassifier::default();
        assert_eq!(
            classifier
                .classify("summarize what happened today")
                .await
                .hints
                .timeframe_days,
            1
        );
        assert_eq!(
            classifier
                .classify("summarize last week")
                .await
                .hints
                .timeframe_days,
            14
        );
        assert_eq!(
            classifier
                .classify("summarize this month")
                .await
                .hints
                .timeframe_days,
            30
        );
    }

    #[tokio::test]
    async fn test_hint_flags() {
        let classifier = KeywordIntentClassifier::default();
        let intent = classifier
            .classify("analyze the sentiment and action items from our meeting")
            .await;
        assert_eq!(intent.category, TaskCategory::Analyze);
        assert!(intent.hints.sentiment_related);
        assert!(intent.hints.task_related);
        assert!(intent.hints.meeting_related);
        assert!(intent.hints.needs_deep_analysis);
    }

    #[tokio::test]
    async fn test_custom_rules() {
        let mut rules = ClassifierRules::default();
        rules.search_keywords.push("grep".to_owned());
        let classifier = KeywordIntentClassifier::new(rules, 3);
        let intent = classifier.classify("grep the logs").await;
        assert_eq!(intent.category, TaskCategory::Search);
        assert_eq!(intent.hints.timeframe_days, 3);
    }
}
