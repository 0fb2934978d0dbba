//! Messaging-analytics provider.
//!
//! Bridges the orchestration core to the text-analytics cascade: loads
//! messages for a context through a [`MessageSource`] and answers search,
//! history-collection, and conversation-analysis actions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use conductor_analytics::{AnalysisOptions, ConversationAnalyzer};
use conductor_core::keys::{self, actions};
use conductor_core::types::{InvocationOutcome, MessageQuery};
use conductor_core::{CapabilityProvider, Error, MessageSource, Result};

/// Default cap on loaded messages per invocation.
const DEFAULT_MESSAGE_LIMIT: usize = 500;

/// Capability provider backed by a message source and the analytics
/// cascade.
pub struct MessagingAnalyticsProvider {
    source: Arc<dyn MessageSource>,
    analyzer: ConversationAnalyzer,
    default_context: String,
}

impl MessagingAnalyticsProvider {
    /// Creates a provider over a message source.
    #[must_use]
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        Self {
            source,
            analyzer: ConversationAnalyzer::default(),
            default_context: String::new(),
        }
    }

    /// Sets the context used when invocation params carry none.
    #[must_use]
    pub fn with_default_context(mut self, context_id: impl Into<String>) -> Self {
        self.default_context = context_id.into();
        self
    }

    /// Replaces the cascade facade, e.g. to supply a custom lexicon.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: ConversationAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    fn query_from(params: &Value) -> MessageQuery {
        let mut query = MessageQuery::new().with_limit(
            params
                .get("limit")
                .and_then(Value::as_u64)
                .map_or(DEFAULT_MESSAGE_LIMIT, |limit| limit as usize),
        );
        if let Some(days) = params.get("timeframe_days").and_then(Value::as_u64) {
            query = query.with_start_date(Utc::now() - Duration::days(days as i64));
        }
        if let Some(channel) = params.get("channel").and_then(Value::as_str) {
            query = query.with_channel(channel);
        }
        query
    }

    fn context_from<'params>(&'params self, params: &'params Value) -> &'params str {
        params
            .get("context_id")
            .and_then(Value::as_str)
            .unwrap_or(&self.default_context)
    }

    async fn analyze_conversations(&self, params: &Value) -> Result<InvocationOutcome> {
        let query = Self::query_from(params);
        let page = self.source.load(self.context_from(params), &query).await?;

        let options = AnalysisOptions {
            include_sentiment: flag(params, "include_sentiment", true),
            include_tasks: flag(params, "include_tasks", true),
            include_meetings: flag(params, "include_meetings", true),
            include_team_insights: flag(params, "include_team_insights", true),
            timeframe_days: params
                .get("timeframe_days")
                .and_then(Value::as_u64)
                .map_or(7, |days| days as u32),
        };

        let analysis = self.analyzer.analyze(&page.messages, &options);
        tracing::debug!(
            messages = analysis.message_count,
            tasks = analysis.tasks.len(),
            meetings = analysis.meetings.len(),
            "conversation analysis complete"
        );

        Ok(InvocationOutcome::ok(json!({
            "analysis": serde_json::to_value(&analysis)?,
            "total_count": page.total_count,
        })))
    }

    async fn collect_history(&self, params: &Value) -> Result<InvocationOutcome> {
        let query = Self::query_from(params);
        let page = self.source.load(self.context_from(params), &query).await?;
        Ok(InvocationOutcome::ok(json!({
            "messages": serde_json::to_value(&page.messages)?,
            "total_count": page.total_count,
        })))
    }

    async fn search(&self, params: &Value) -> Result<InvocationOutcome> {
        let needle = params
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidParams("search requires a query".to_owned()))?
            .to_lowercase();

        let query = Self::query_from(params);
        let page = self.source.load(self.context_from(params), &query).await?;
        let matches: Vec<Value> = page
            .messages
            .iter()
            .filter(|message| message.text.to_lowercase().contains(&needle))
            .map(|message| {
                json!({
                    "id": message.id,
                    "text": message.text,
                    "author": message.author.name,
                    "channel": message.channel.name,
                    "timestamp": message.timestamp,
                })
            })
            .collect();

        Ok(InvocationOutcome::ok(json!({
            "matches": matches,
            "searched": page.total_count,
        })))
    }
}

#[async_trait]
impl CapabilityProvider for MessagingAnalyticsProvider {
    fn key(&self) -> &'static str {
        keys::MESSAGING
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn invoke(&self, action: &str, params: &Value) -> Result<InvocationOutcome> {
        match action {
            actions::ANALYZE_CONVERSATIONS => self.analyze_conversations(params).await,
            actions::COLLECT_HISTORY => self.collect_history(params).await,
            actions::SEARCH => self.search(params).await,
            other => Err(Error::UnsupportedAction {
                provider: keys::MESSAGING.to_owned(),
                action: other.to_owned(),
            }),
        }
    }
}

fn flag(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_source::StaticMessageSource;
    use chrono::{TimeZone as _, Utc};
    use conductor_core::types::{ChatMessage, MessageAuthor, MessageChannel};

    fn message(id: usize, author: &str, minute: u32, text: &str) -> ChatMessage {
        ChatMessage {
            id: format!("m{id}"),
            text: text.to_owned(),
            author: MessageAuthor {
                id: author.to_lowercase(),
                name: author.to_owned(),
            },
            channel: MessageChannel {
                id: "c1".to_owned(),
                name: "general".to_owned(),
            },
            timestamp: Utc
                .with_ymd_and_hms(2025, 3, 10, 9, minute, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    fn provider() -> MessagingAnalyticsProvider {
        let source = StaticMessageSource::new(vec![
            message(0, "Ana", 0, "kicking off the planning discussion"),
            message(1, "Ben", 2, "need @cleo to finish the budget review today"),
            message(2, "Cleo", 4, "sounds great, thanks"),
        ]);
        MessagingAnalyticsProvider::new(Arc::new(source)).with_default_context("ctx-1")
    }

    #[tokio::test]
    async fn test_analyze_conversations_payload_shape() {
        let outcome = provider()
            .invoke(actions::ANALYZE_CONVERSATIONS, &json!({}))
            .await;
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => panic!("invoke failed: {error}"),
        };

        assert!(outcome.success);
        let analysis = &outcome.data["analysis"];
        assert_eq!(analysis["message_count"], 3);
        assert!(analysis["sentiment"]["score"].as_f64().unwrap_or(0.0) > 0.0);
        assert_eq!(analysis["tasks"][0]["assignee"], "cleo");
    }

    #[tokio::test]
    async fn test_include_flags_gate_sections() {
        let outcome = provider()
            .invoke(
                actions::ANALYZE_CONVERSATIONS,
                &json!({ "include_sentiment": false, "include_meetings": false }),
            )
            .await;
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => panic!("invoke failed: {error}"),
        };
        assert!(outcome.data["analysis"]["sentiment"].is_null());
        assert_eq!(outcome.data["analysis"]["meetings"], json!([]));
    }

    #[tokio::test]
    async fn test_search_matches_text() {
        let outcome = provider()
            .invoke(actions::SEARCH, &json!({ "query": "budget" }))
            .await;
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => panic!("invoke failed: {error}"),
        };
        let matches = outcome.data["matches"].as_array().map(Vec::len);
        assert_eq!(matches, Some(1));
    }

    #[tokio::test]
    async fn test_unknown_action_rejected() {
        let error = provider().invoke("teleport", &json!({})).await.err();
        assert!(matches!(error, Some(Error::UnsupportedAction { .. })));
    }

    #[tokio::test]
    async fn test_collect_history_returns_messages() {
        let outcome = provider()
            .invoke(actions::COLLECT_HISTORY, &json!({ "limit": 2 }))
            .await;
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => panic!("invoke failed: {error}"),
        };
        assert_eq!(outcome.data["total_count"], 3);
        let returned = outcome.data["messages"].as_array().map(Vec::len);
        assert_eq!(returned, Some(2));
    }
}
