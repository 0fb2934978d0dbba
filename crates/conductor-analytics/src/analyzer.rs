//! Cascade facade combining every analysis stage.
//!
//! Providers and tests drive the cascade through one entry point: pick the
//! sub-analyses to run with [`AnalysisOptions`], hand over a message set, and
//! get one [`ConversationAnalysis`] back.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use conductor_core::types::ChatMessage;

use crate::extract::{TaskExtractor, TaskItem};
use crate::insight::{TeamInsightSynthesizer, TeamInsights};
use crate::lexicon::{Lexicon, PriorityWeights};
use crate::meeting::{MeetingAnalyzer, MeetingThread};
use crate::sentiment::{SentimentResult, SentimentScorer};

/// Which sub-analyses to run, and over what window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Run the sentiment scorer over the combined text.
    pub include_sentiment: bool,
    /// Run action-item extraction.
    pub include_tasks: bool,
    /// Run meeting-thread detection.
    pub include_meetings: bool,
    /// Run team-insight synthesis.
    pub include_team_insights: bool,
    /// Lookback window the caller used to select messages, in days.
    pub timeframe_days: u32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_sentiment: true,
            include_tasks: true,
            include_meetings: true,
            include_team_insights: true,
            timeframe_days: 7,
        }
    }
}

/// Structured signals produced from one message set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationAnalysis {
    /// Blended sentiment over the combined text, when requested.
    pub sentiment: Option<SentimentResult>,
    /// Deduplicated action items, when requested.
    pub tasks: Vec<TaskItem>,
    /// Detected meeting threads, when requested.
    pub meetings: Vec<MeetingThread>,
    /// Team insights, when requested.
    pub team_insights: Option<TeamInsights>,
    /// Number of messages analyzed.
    pub message_count: usize,
    /// Wall-clock processing time.
    pub processing_time_ms: u64,
}

/// Facade over the full text-analytics cascade.
#[derive(Debug, Clone, Default)]
pub struct ConversationAnalyzer {
    scorer: SentimentScorer,
    extractor: TaskExtractor,
    meetings: MeetingAnalyzer,
    insights: TeamInsightSynthesizer,
}

impl ConversationAnalyzer {
    /// Creates an analyzer whose stages share one lexicon and one set of
    /// priority weights.
    #[must_use]
    pub fn new(lexicon: Lexicon, weights: PriorityWeights) -> Self {
        let scorer = SentimentScorer::new(lexicon.clone());
        let extractor = TaskExtractor::new(lexicon, weights);
        let meetings = MeetingAnalyzer::new(scorer.clone(), extractor.clone());
        Self {
            scorer,
            extractor,
            meetings,
            insights: TeamInsightSynthesizer,
        }
    }

    /// Runs the requested sub-analyses over a message set.
    #[must_use]
    pub fn analyze(
        &self,
        messages: &[ChatMessage],
        options: &AnalysisOptions,
    ) -> ConversationAnalysis {
        let started = Instant::now();
        tracing::debug!(
            messages = messages.len(),
            timeframe_days = options.timeframe_days,
            "running conversation analysis"
        );

        let sentiment = options.include_sentiment.then(|| {
            let joined: String = messages
                .iter()
                .map(|message| message.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            self.scorer.analyze(&joined)
        });

        let tasks = if options.include_tasks {
            self.extractor.extract(messages)
        } else {
            Vec::new()
        };

        let meetings = if options.include_meetings {
            self.meetings.analyze(messages)
        } else {
            Vec::new()
        };

        let team_insights = options
            .include_team_insights
            .then(|| self.insights.synthesize(messages));

        ConversationAnalysis {
            sentiment,
            tasks,
            meetings,
            team_insights,
            message_count: messages.len(),
            processing_time_ms: started.elapsed().as_millis() as u64,
        }
    }
}
