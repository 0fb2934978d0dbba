//! Temporal clustering and meeting-thread detection.
//!
//! Messages are grouped into clusters separated by silence gaps; a cluster
//! qualifies as a meeting thread only when it looks like a live discussion:
//! a discussion indicator, several participants, and a message density above
//! a chat-noise floor.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use conductor_core::types::ChatMessage;

use crate::extract::{TaskExtractor, TaskItem};
use crate::lexicon::Lexicon;
use crate::sentiment::{Polarity, SentimentScorer};

/// Silence gap that ends a cluster, in minutes.
const CLUSTER_GAP_MINUTES: i64 = 30;
/// Minimum distinct participants for a meeting thread.
const MIN_PARTICIPANTS: usize = 2;
/// Minimum messages per hour for a meeting thread.
const MIN_DENSITY_PER_HOUR: f64 = 10.0;
/// Messages considered for topic-term counting.
const TOPIC_MESSAGE_WINDOW: usize = 5;
/// Number of topic terms kept.
const TOPIC_TERM_COUNT: usize = 3;
/// Fixed confidence attached to keyword-detected decisions.
const DECISION_CONFIDENCE: f64 = 0.8;

/// Sentiment classification of a whole thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSentiment {
    /// Positive blended sentiment.
    Productive,
    /// Neutral blended sentiment.
    Neutral,
    /// Negative sentiment or conflict-word overlap.
    Tense,
}

/// A decision captured inside a meeting thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPoint {
    /// The deciding message's text.
    pub description: String,
    /// Author of the deciding message.
    pub decision_maker: String,
    /// When the decision was posted.
    pub timestamp: DateTime<Utc>,
    /// Detection confidence; keyword detection is fixed at 0.8.
    pub confidence: f64,
}

/// A detected meeting-like thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingThread {
    /// Unique identifier.
    pub id: Uuid,
    /// Most frequent non-stopword terms across the opening messages.
    pub topic: Vec<String>,
    /// Distinct participant names.
    pub participants: Vec<String>,
    /// First message timestamp.
    pub started_at: DateTime<Utc>,
    /// Span from first to last message, in minutes.
    pub duration_minutes: i64,
    /// Decisions captured in the thread.
    pub decisions: Vec<DecisionPoint>,
    /// Action items extracted from the thread's messages.
    pub action_items: Vec<TaskItem>,
    /// Blended thread sentiment.
    pub sentiment: ThreadSentiment,
}

/// Clusters message streams into candidate meeting threads.
#[derive(Debug, Clone, Default)]
pub struct MeetingAnalyzer {
    scorer: SentimentScorer,
    extractor: TaskExtractor,
}

impl MeetingAnalyzer {
    /// Creates an analyzer reusing existing scorer and extractor instances.
    #[must_use]
    pub fn new(scorer: SentimentScorer, extractor: TaskExtractor) -> Self {
        Self { scorer, extractor }
    }

    /// Detects meeting threads in a message stream.
    ///
    /// Messages are sorted by timestamp before clustering, so callers may
    /// pass them in any order.
    #[must_use]
    pub fn analyze(&self, messages: &[ChatMessage]) -> Vec<MeetingThread> {
        let mut sorted: Vec<&ChatMessage> = messages.iter().collect();
        sorted.sort_by_key(|message| message.timestamp);

        cluster(&sorted)
            .into_iter()
            .filter(|cluster| self.qualifies(cluster))
            .map(|cluster| self.build_thread(&cluster))
            .collect()
    }

    /// A cluster qualifies iff it has a discussion indicator, enough
    /// participants, and meeting-like density.
    fn qualifies(&self, cluster: &[&ChatMessage]) -> bool {
        let has_discussion = cluster
            .iter()
            .any(|message| Lexicon::has_discussion_term(&message.text));
        if !has_discussion {
            return false;
        }
        if participant_names(cluster).len() < MIN_PARTICIPANTS {
            return false;
        }
        density_per_hour(cluster) > MIN_DENSITY_PER_HOUR
    }

    fn build_thread(&self, cluster: &[&ChatMessage]) -> MeetingThread {
        let started_at = cluster.first().map(|message| message.timestamp);
        let ended_at = cluster.last().map(|message| message.timestamp);
        let duration_minutes = match (started_at, ended_at) {
            (Some(start), Some(end)) => (end - start).num_minutes(),
            _ => 0,
        };

        let decisions = cluster
            .iter()
            .filter(|message| Lexicon::has_meeting_decision_term(&message.text))
            .map(|message| DecisionPoint {
                description: message.text.clone(),
                decision_maker: message.author.name.clone(),
                timestamp: message.timestamp,
                confidence: DECISION_CONFIDENCE,
            })
            .collect();

        let owned: Vec<ChatMessage> = cluster.iter().map(|message| (*message).clone()).collect();
        let action_items = self.extractor.extract(&owned);

        let joined: String = cluster
            .iter()
            .map(|message| message.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let blended = self.scorer.analyze(&joined);
        let conflict = blended
            .negative
            .iter()
            .any(|token| Lexicon::is_conflict_term(token));
        let sentiment = match blended.classification {
            _ if conflict => ThreadSentiment::Tense,
            Polarity::Negative => ThreadSentiment::Tense,
            Polarity::Positive => ThreadSentiment::Productive,
            Polarity::Neutral => ThreadSentiment::Neutral,
        };

        MeetingThread {
            id: Uuid::new_v4(),
            topic: topic_terms(cluster),
            participants: participant_names(cluster),
            started_at: started_at.unwrap_or_default(),
            duration_minutes,
            decisions,
            action_items,
            sentiment,
        }
    }
}

/// Splits a time-sorted stream wherever the silence gap exceeds 30 minutes.
fn cluster<'stream>(sorted: &[&'stream ChatMessage]) -> Vec<Vec<&'stream ChatMessage>> {
    let gap = Duration::minutes(CLUSTER_GAP_MINUTES);
    let mut clusters: Vec<Vec<&ChatMessage>> = Vec::new();

    for &message in sorted {
        match clusters.last_mut() {
            Some(current) => {
                let previous = current.last().map(|prior| prior.timestamp);
                if previous.is_some_and(|prior| message.timestamp - prior > gap) {
                    clusters.push(vec![message]);
                } else {
                    current.push(message);
                }
            }
            None => clusters.push(vec![message]),
        }
    }
    clusters
}

fn participant_names(cluster: &[&ChatMessage]) -> Vec<String> {
    let mut names = Vec::new();
    for message in cluster {
        if !names.contains(&message.author.name) {
            names.push(message.author.name.clone());
        }
    }
    names
}

/// Messages per hour; sub-minute clusters are measured against a one-minute
/// floor so instantaneous bursts do not divide by zero.
fn density_per_hour(cluster: &[&ChatMessage]) -> f64 {
    let (Some(first), Some(last)) = (cluster.first(), cluster.last()) else {
        return 0.0;
    };
    let minutes = (last.timestamp - first.timestamp).num_minutes().max(1);
    cluster.len() as f64 * 60.0 / minutes as f64
}

/// Top non-stopword terms across the cluster's opening messages.
fn topic_terms(cluster: &[&ChatMessage]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for message in cluster.iter().take(TOPIC_MESSAGE_WINDOW) {
        for token in message.text.to_lowercase().split_whitespace() {
            let token = token.trim_matches(|ch: char| !ch.is_alphanumeric());
            if token.chars().count() < 3 || Lexicon::is_stopword(token) {
                continue;
            }
            *counts.entry(token.to_owned()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    ranked
        .into_iter()
        .take(TOPIC_TERM_COUNT)
        .map(|(term, _)| term)
        .collect()
}
