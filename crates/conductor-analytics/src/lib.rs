//! Text-analytics cascade for conversational messages.
//!
//! Turns raw chat messages into structured signals: per-language sentiment,
//! extracted action items, meeting-thread detection, and team-collaboration
//! insights. All classification here is heuristic (lexicon- and
//! pattern-driven), not ML-trained.

/// Cascade facade combining every analysis stage.
pub mod analyzer;
/// Action-item and entity extraction.
pub mod extract;
/// Team-collaboration insight synthesis.
pub mod insight;
/// Script-ratio language detection and segmentation.
pub mod language;
/// Static per-language sentiment weights and pattern sets.
pub mod lexicon;
/// Temporal clustering and meeting-thread detection.
pub mod meeting;
/// Dictionary and polarity sentiment scoring.
pub mod sentiment;

pub use analyzer::{AnalysisOptions, ConversationAnalysis, ConversationAnalyzer};
pub use extract::{MessageRef, TaskComplexity, TaskExtractor, TaskItem, TaskItemStatus, TaskType};
pub use insight::{
    CommunicationMetrics, Recommendation, RecommendationKind, RiskFactor, RiskKind, RiskSeverity,
    TeamInsightSynthesizer, TeamInsights,
};
pub use language::{Language, LanguageDetection, LanguageDetector, LanguageSegment};
pub use lexicon::{Lexicon, PriorityWeights};
pub use meeting::{DecisionPoint, MeetingAnalyzer, MeetingThread, ThreadSentiment};
pub use sentiment::{ContextualFactors, Emotion, Polarity, SentimentResult, SentimentScorer};
