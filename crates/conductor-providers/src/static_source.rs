//! In-memory message source.
//!
//! Deterministic stand-in for a real messaging backend; honors the same
//! limit, start-date, and channel filters.

use async_trait::async_trait;

use conductor_core::types::{ChatMessage, MessagePage, MessageQuery};
use conductor_core::{MessageSource, Result};

/// Message source backed by an in-memory vector.
#[derive(Debug, Clone, Default)]
pub struct StaticMessageSource {
    messages: Vec<ChatMessage>,
}

impl StaticMessageSource {
    /// Creates a source over a fixed message set.
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Appends one message.
    #[must_use]
    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Number of stored messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the source holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[async_trait]
impl MessageSource for StaticMessageSource {
    async fn load(&self, _context_id: &str, query: &MessageQuery) -> Result<MessagePage> {
        let mut matches: Vec<ChatMessage> = self
            .messages
            .iter()
            .filter(|message| {
                query
                    .start_date
                    .is_none_or(|start| message.timestamp >= start)
            })
            .filter(|message| {
                query
                    .channel
                    .as_deref()
                    .is_none_or(|channel| message.channel.id == channel)
            })
            .cloned()
            .collect();
        matches.sort_by_key(|message| message.timestamp);

        let total_count = matches.len();
        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }

        Ok(MessagePage {
            messages: matches,
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone as _, Utc};
    use conductor_core::types::{MessageAuthor, MessageChannel};

    fn message(id: usize, channel: &str, minute: i64) -> ChatMessage {
        ChatMessage {
            id: format!("m{id}"),
            text: "content".to_owned(),
            author: MessageAuthor {
                id: "u1".to_owned(),
                name: "Ana".to_owned(),
            },
            channel: MessageChannel {
                id: channel.to_owned(),
                name: channel.to_owned(),
            },
            timestamp: Utc
                .with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
                .single()
                .unwrap_or_default()
                + Duration::minutes(minute),
        }
    }

    #[tokio::test]
    async fn test_filters_and_total_count() {
        let source = StaticMessageSource::new(vec![
            message(0, "general", 0),
            message(1, "general", 10),
            message(2, "incidents", 20),
            message(3, "general", 30),
        ]);

        let query = MessageQuery::new().with_channel("general").with_limit(2);
        let page = match source.load("ctx", &query).await {
            Ok(page) => page,
            Err(error) => panic!("load failed: {error}"),
        };

        assert_eq!(page.total_count, 3);
        assert_eq!(page.messages.len(), 2);
        assert!(page.messages.iter().all(|msg| msg.channel.id == "general"));
    }

    #[tokio::test]
    async fn test_start_date_filter() {
        let source = StaticMessageSource::new(vec![message(0, "general", 0), message(1, "general", 60)]);
        let cutoff = Utc
            .with_ymd_and_hms(2025, 3, 10, 9, 30, 0)
            .single()
            .unwrap_or_default();
        let page = match source.load("ctx", &MessageQuery::new().with_start_date(cutoff)).await {
            Ok(page) => page,
            Err(error) => panic!("load failed: {error}"),
        };
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].id, "m1");
    }
}
