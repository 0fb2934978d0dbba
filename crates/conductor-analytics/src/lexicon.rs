//! Static per-language sentiment weights and pattern sets.
//!
//! Every downstream stage reads its keyword lists and compiled patterns from
//! here. The tables are plain data with `Default` assembly so callers can
//! override individual entries; none of them are tuned against a labelled
//! corpus.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// English sentiment weights, on the usual -5..+5 scale.
const EN_WEIGHTS: &[(&str, f64)] = &[
    ("amazing", 4.0),
    ("awesome", 4.0),
    ("bad", -3.0),
    ("best", 3.0),
    ("blocked", -2.0),
    ("broken", -2.0),
    ("brilliant", 4.0),
    ("confusing", -2.0),
    ("delay", -1.0),
    ("disappointed", -2.0),
    ("excellent", 3.0),
    ("fail", -2.0),
    ("failed", -2.0),
    ("fantastic", 4.0),
    ("fine", 1.0),
    ("frustrated", -2.0),
    ("frustrating", -2.0),
    ("good", 3.0),
    ("great", 3.0),
    ("happy", 3.0),
    ("hate", -3.0),
    ("helpful", 2.0),
    ("horrible", -3.0),
    ("issue", -1.0),
    ("love", 3.0),
    ("nice", 3.0),
    ("perfect", 3.0),
    ("pleased", 2.0),
    ("problem", -2.0),
    ("sad", -2.0),
    ("satisfied", 2.0),
    ("terrible", -3.0),
    ("thanks", 2.0),
    ("thank", 2.0),
    ("useless", -2.0),
    ("wonderful", 4.0),
    ("worst", -3.0),
    ("wrong", -2.0),
];

/// Ideographic-script sentiment weights (Chinese, plus terms shared with
/// Japanese kanji usage), same -5..+5 scale.
const ZH_WEIGHTS: &[(&str, f64)] = &[
    ("好", 2.0),
    ("很好", 3.0),
    ("太好了", 4.0),
    ("优秀", 3.0),
    ("完美", 3.0),
    ("开心", 3.0),
    ("高兴", 3.0),
    ("满意", 2.0),
    ("喜欢", 2.0),
    ("感谢", 2.0),
    ("谢谢", 2.0),
    ("顺利", 2.0),
    ("成功", 3.0),
    ("棒", 3.0),
    ("差", -2.0),
    ("坏", -2.0),
    ("糟糕", -3.0),
    ("失败", -2.0),
    ("失望", -2.0),
    ("讨厌", -3.0),
    ("生气", -2.0),
    ("难过", -2.0),
    ("问题", -1.0),
    ("麻烦", -1.0),
    ("担心", -1.0),
    ("延迟", -1.0),
];

/// Negation tokens; presence flips and dampens the raw score.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "cannot", "can't", "don't", "doesn't", "won't", "didn't", "isn't",
    "wasn't", "without", "hardly", "不", "没", "没有", "别", "无法",
];

/// Intensifier tokens; each occurrence amplifies the raw score.
const INTENSIFIERS: &[&str] = &[
    "very",
    "really",
    "extremely",
    "absolutely",
    "incredibly",
    "totally",
    "highly",
    "super",
    "很",
    "非常",
    "特别",
    "极其",
    "太",
];

/// Emoticons recognized by the contextual adjustment step.
const EMOTICONS: &[&str] = &[
    ":)", ":-)", ":D", ":-D", ";)", ";-)", ":(", ":-(", ":'(", "😊", "😄", "🎉", "👍", "😞", "😢",
    "😡",
];

/// Words that carry an emotion label with an intensity.
const EMOTION_WEIGHTS: &[(&str, &str, f64)] = &[
    ("happy", "joy", 0.9),
    ("excited", "joy", 0.9),
    ("glad", "joy", 0.7),
    ("delighted", "joy", 0.9),
    ("开心", "joy", 0.9),
    ("高兴", "joy", 0.9),
    ("sad", "sadness", 0.9),
    ("unhappy", "sadness", 0.8),
    ("disappointed", "sadness", 0.7),
    ("难过", "sadness", 0.9),
    ("失望", "sadness", 0.7),
    ("angry", "anger", 0.9),
    ("furious", "anger", 1.0),
    ("frustrated", "anger", 0.7),
    ("annoyed", "anger", 0.6),
    ("生气", "anger", 0.9),
    ("worried", "fear", 0.7),
    ("afraid", "fear", 0.9),
    ("anxious", "fear", 0.8),
    ("担心", "fear", 0.7),
    ("surprised", "surprise", 0.8),
    ("shocked", "surprise", 0.9),
    ("amazed", "surprise", 0.8),
    ("trust", "trust", 0.7),
    ("confident", "trust", 0.8),
    ("reliable", "trust", 0.7),
];

/// Urgency indicators scanned over the full source message.
const URGENCY_TERMS: &[&str] = &[
    "urgent", "urgently", "asap", "immediately", "right away", "right now", "critical",
    "emergency", "blocker", "by eod", "end of day", "尽快", "紧急", "马上", "立刻",
];

/// Urgency terms that carry the larger critical-tier bonus.
const CRITICAL_TERMS: &[&str] = &["critical", "emergency", "blocker", "紧急"];

/// Same-day time indicators.
const SAME_DAY_TERMS: &[&str] = &[
    "today",
    "tonight",
    "this afternoon",
    "this morning",
    "by eod",
    "end of day",
    "今天",
    "今晚",
];

/// Next-day time indicators.
const NEXT_DAY_TERMS: &[&str] = &["tomorrow", "明天"];

/// Generic time references beyond the same-day/next-day tiers.
const OTHER_TIME_TERMS: &[&str] = &[
    "this week",
    "next week",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "by the",
    "deadline",
    "due",
    "这周",
    "下周",
];

/// Explicit action verbs; presence raises extraction confidence.
const ACTION_VERBS: &[&str] = &[
    "finish", "complete", "send", "review", "write", "fix", "update", "create", "prepare",
    "schedule", "deploy", "merge", "test", "check", "draft", "share", "完成", "发送", "检查",
    "准备",
];

/// Role keywords treated as stakeholder references.
const ROLE_TERMS: &[&str] = &[
    "manager", "lead", "engineer", "designer", "team", "product", "qa", "ops", "经理", "团队",
];

/// Keywords marking a decision-type task.
const DECISION_TERMS: &[&str] = &[
    "decide", "decided", "decision", "choose", "approve", "approved", "agreed", "决定", "批准",
];

/// Keywords marking a follow-up-type task.
const FOLLOW_UP_TERMS: &[&str] = &["follow up", "follow-up", "check in", "circle back", "跟进"];

/// Keywords marking a reminder-type task.
const REMINDER_TERMS: &[&str] = &["remember", "don't forget", "reminder", "remind", "别忘了"];

/// Keywords marking a question-type task.
const QUESTION_TERMS: &[&str] = &["what", "how", "why", "when", "which", "can we", "should we"];

/// Simple-tier complexity keywords.
const SIMPLE_TERMS: &[&str] = &["quick", "small", "minor", "trivial", "simple", "简单"];

/// Complex-tier complexity keywords.
const COMPLEX_TERMS: &[&str] = &[
    "architecture",
    "migration",
    "refactor",
    "integrate",
    "integration",
    "redesign",
    "complex",
    "复杂",
];

/// Discussion indicators used by the meeting analyzer.
const DISCUSSION_TERMS: &[&str] = &[
    "meeting", "discuss", "discussion", "agenda", "sync", "standup", "stand-up", "call",
    "retrospective", "review", "会议", "讨论",
];

/// Decision indicators inside a meeting cluster.
const MEETING_DECISION_TERMS: &[&str] = &[
    "decided", "decision", "we'll go with", "agreed", "approved", "final", "决定",
];

/// Conflict words that downgrade a thread to tense.
const CONFLICT_TERMS: &[&str] = &[
    "disagree",
    "conflict",
    "wrong",
    "blocked",
    "frustrated",
    "frustrating",
    "angry",
    "unacceptable",
    "terrible",
];

/// Stress-lexicon tokens used for the stress risk factor.
const STRESS_TERMS: &[&str] = &[
    "stressed",
    "stress",
    "overwhelmed",
    "exhausted",
    "burnout",
    "burned out",
    "too much",
    "pressure",
    "tired",
    "压力",
    "累",
];

/// Stopwords excluded from topic-term frequency counting.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "to", "of", "in", "on", "for", "with", "at", "is",
    "are", "was", "were", "be", "been", "we", "i", "you", "it", "this", "that", "have", "has",
    "will", "can", "so", "about", "let's", "our", "my",
];

/// Ordered action-item extraction patterns for alphabetic text.
///
/// Order matters: earlier patterns claim their match first, so obligation
/// phrasing wins over politeness phrasing for the same span.
static TASK_PATTERNS_EN: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:need(?:s)?\s+(?:@[A-Za-z0-9_.-]+\s+)?to|have to|must|should)\s+(.{3,120}?)(?:[.!?\n]|$)",
        r"(?i)\bplease\s+(.{3,120}?)(?:[.!?\n]|$)",
        r"(?i)\b(?:can|could|would)\s+(?:you|someone|we)\s+(.{3,120}?)(?:[.!?\n]|$)",
        r"(?i)\b(?:by|before|due)\s+(?:today|tonight|tomorrow|eod|monday|tuesday|wednesday|thursday|friday)\s*[:,]?\s+(.{3,120}?)(?:[.!?\n]|$)",
        r"(?i)\b(?:remember|don't forget)\s+to\s+(.{3,120}?)(?:[.!?\n]|$)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Ordered action-item extraction patterns for ideographic text.
static TASK_PATTERNS_ZH: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:需要|必须|应该)(.{2,60}?)(?:[。！？\n]|$)",
        r"(?:请|麻烦)(.{2,60}?)(?:[。！？\n]|$)",
        r"别忘了(.{2,60}?)(?:[。！？\n]|$)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// `@mention` extraction pattern.
static MENTION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_.-]+)").ok());

/// Point weights and thresholds for the extractor's priority score.
///
/// Kept as named, overridable values rather than inline literals.
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeights {
    /// Starting score; lands in the medium band on its own.
    pub baseline: i32,
    /// Added once per urgency indicator found in the message.
    pub urgency: i32,
    /// Added on top when a critical-tier urgency term is present.
    pub critical_bonus: i32,
    /// Added when a same-day time indicator is present.
    pub same_day: i32,
    /// Added when a next-day time indicator is present.
    pub next_day: i32,
    /// Added when the task type is a decision.
    pub decision: i32,
    /// Scores at or above this map to urgent.
    pub urgent_threshold: i32,
    /// Scores at or above this map to high.
    pub high_threshold: i32,
    /// Scores at or above this map to medium; anything lower is low.
    pub medium_threshold: i32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            baseline: 2,
            urgency: 1,
            critical_bonus: 2,
            same_day: 2,
            next_day: 1,
            decision: 1,
            urgent_threshold: 6,
            high_threshold: 4,
            medium_threshold: 2,
        }
    }
}

/// Assembled lexicon handed to every cascade stage.
///
/// Word tables are owned maps so individual entries can be overridden;
/// compiled regex patterns are shared statics.
#[derive(Debug, Clone)]
pub struct Lexicon {
    en_weights: HashMap<String, f64>,
    zh_weights: HashMap<String, f64>,
    negations: HashSet<String>,
    intensifiers: HashSet<String>,
    emotions: HashMap<String, (String, f64)>,
    /// Longest ideographic lexicon entry, in chars; bounds greedy matching.
    zh_max_word: usize,
}

impl Default for Lexicon {
    fn default() -> Self {
        let en_weights = EN_WEIGHTS
            .iter()
            .map(|&(word, weight)| (word.to_owned(), weight))
            .collect();
        let zh_weights: HashMap<String, f64> = ZH_WEIGHTS
            .iter()
            .map(|&(word, weight)| (word.to_owned(), weight))
            .collect();
        let zh_max_word = zh_weights
            .keys()
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(1);

        Self {
            en_weights,
            zh_weights,
            negations: NEGATIONS.iter().map(|&word| word.to_owned()).collect(),
            intensifiers: INTENSIFIERS.iter().map(|&word| word.to_owned()).collect(),
            emotions: EMOTION_WEIGHTS
                .iter()
                .map(|&(word, emotion, weight)| (word.to_owned(), (emotion.to_owned(), weight)))
                .collect(),
            zh_max_word,
        }
    }
}

impl Lexicon {
    /// Overrides or adds one alphabetic-lexicon weight.
    #[must_use]
    pub fn with_en_weight(mut self, word: impl Into<String>, weight: f64) -> Self {
        self.en_weights.insert(word.into(), weight);
        self
    }

    /// Overrides or adds one ideographic-lexicon weight.
    #[must_use]
    pub fn with_zh_weight(mut self, word: impl Into<String>, weight: f64) -> Self {
        let word = word.into();
        self.zh_max_word = self.zh_max_word.max(word.chars().count());
        self.zh_weights.insert(word, weight);
        self
    }

    /// Weight of an alphabetic token, if known.
    #[must_use]
    pub fn en_weight(&self, token: &str) -> Option<f64> {
        self.en_weights.get(token).copied()
    }

    /// Weight of an ideographic word, if known.
    #[must_use]
    pub fn zh_weight(&self, word: &str) -> Option<f64> {
        self.zh_weights.get(word).copied()
    }

    /// Longest ideographic entry length in chars.
    #[must_use]
    pub fn zh_max_word(&self) -> usize {
        self.zh_max_word
    }

    /// Whether the token is a negation.
    #[must_use]
    pub fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token)
    }

    /// Whether the token is an intensifier.
    #[must_use]
    pub fn is_intensifier(&self, token: &str) -> bool {
        self.intensifiers.contains(token)
    }

    /// Emotion label and intensity carried by a token, if any.
    #[must_use]
    pub fn emotion(&self, token: &str) -> Option<(&str, f64)> {
        self.emotions
            .get(token)
            .map(|(emotion, weight)| (emotion.as_str(), *weight))
    }

    /// Emoticons present in the text.
    #[must_use]
    pub fn emoticons_in(&self, text: &str) -> Vec<String> {
        EMOTICONS
            .iter()
            .filter(|emoticon| text.contains(*emoticon))
            .map(|&emoticon| emoticon.to_owned())
            .collect()
    }

    /// Ordered extraction patterns for alphabetic text.
    #[must_use]
    pub fn task_patterns_en() -> &'static [Regex] {
        &TASK_PATTERNS_EN
    }

    /// Ordered extraction patterns for ideographic text.
    #[must_use]
    pub fn task_patterns_zh() -> &'static [Regex] {
        &TASK_PATTERNS_ZH
    }

    /// `@mention` pattern.
    #[must_use]
    pub fn mention_pattern() -> Option<&'static Regex> {
        MENTION_PATTERN.as_ref()
    }

    /// Urgency indicators found in the text, lowercased scan.
    #[must_use]
    pub fn urgency_hits(text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        URGENCY_TERMS
            .iter()
            .filter(|term| lower.contains(*term))
            .copied()
            .collect()
    }

    /// Whether a critical-tier urgency term is present.
    #[must_use]
    pub fn has_critical_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        CRITICAL_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether a same-day time indicator is present.
    #[must_use]
    pub fn has_same_day_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        SAME_DAY_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether a next-day time indicator is present.
    #[must_use]
    pub fn has_next_day_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        NEXT_DAY_TERMS.iter().any(|term| lower.contains(term))
    }

    /// First time indicator of any tier found in the text.
    #[must_use]
    pub fn time_indicator(text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        SAME_DAY_TERMS
            .iter()
            .chain(NEXT_DAY_TERMS)
            .chain(OTHER_TIME_TERMS)
            .find(|term| lower.contains(*term))
            .copied()
    }

    /// Whether the token is an explicit action verb.
    #[must_use]
    pub fn is_action_verb(token: &str) -> bool {
        ACTION_VERBS.contains(&token)
    }

    /// Whether the token is a role keyword.
    #[must_use]
    pub fn is_role_term(token: &str) -> bool {
        ROLE_TERMS.contains(&token)
    }

    /// Whether the text contains a decision keyword.
    #[must_use]
    pub fn has_decision_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        DECISION_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the text contains a follow-up keyword.
    #[must_use]
    pub fn has_follow_up_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        FOLLOW_UP_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the text contains a reminder keyword.
    #[must_use]
    pub fn has_reminder_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        REMINDER_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the text contains a question keyword.
    #[must_use]
    pub fn has_question_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        text.contains('?') || QUESTION_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the text contains a simple-tier complexity keyword.
    #[must_use]
    pub fn has_simple_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        SIMPLE_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the text contains a complex-tier complexity keyword.
    #[must_use]
    pub fn has_complex_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        COMPLEX_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the text contains a discussion indicator.
    #[must_use]
    pub fn has_discussion_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        DISCUSSION_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the text contains a meeting-decision indicator.
    #[must_use]
    pub fn has_meeting_decision_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        MEETING_DECISION_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the token overlaps the conflict-word list.
    #[must_use]
    pub fn is_conflict_term(token: &str) -> bool {
        CONFLICT_TERMS.contains(&token)
    }

    /// Whether the text contains a stress-lexicon token.
    #[must_use]
    pub fn has_stress_term(text: &str) -> bool {
        let lower = text.to_lowercase();
        STRESS_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Whether the token is a stopword for topic counting.
    #[must_use]
    pub fn is_stopword(token: &str) -> bool {
        STOPWORDS.contains(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_lookups() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.en_weight("great"), Some(3.0));
        assert_eq!(lexicon.en_weight("terrible"), Some(-3.0));
        assert_eq!(lexicon.zh_weight("很好"), Some(3.0));
        assert!(lexicon.en_weight("table").is_none());
    }

    #[test]
    fn test_weight_overrides() {
        let lexicon = Lexicon::default()
            .with_en_weight("meh", -0.5)
            .with_zh_weight("还不错", 1.5);
        assert_eq!(lexicon.en_weight("meh"), Some(-0.5));
        assert_eq!(lexicon.zh_weight("还不错"), Some(1.5));
        assert!(lexicon.zh_max_word() >= 3);
    }

    #[test]
    fn test_context_tables() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_negation("not"));
        assert!(lexicon.is_negation("没有"));
        assert!(lexicon.is_intensifier("very"));
        assert!(!lexicon.is_intensifier("slightly"));
        assert_eq!(
            lexicon.emoticons_in("shipped it :) 🎉"),
            vec![":)".to_owned(), "🎉".to_owned()]
        );
    }

    #[test]
    fn test_urgency_and_time_scans() {
        assert_eq!(Lexicon::urgency_hits("this is URGENT, fix asap").len(), 2);
        assert!(Lexicon::has_critical_term("critical outage"));
        assert!(Lexicon::has_same_day_term("finish it today"));
        assert!(Lexicon::has_next_day_term("demo tomorrow"));
        assert_eq!(Lexicon::time_indicator("done by friday"), Some("friday"));
        assert!(Lexicon::time_indicator("no dates here").is_none());
    }

    #[test]
    fn test_task_patterns_capture_action() {
        let patterns = Lexicon::task_patterns_en();
        assert!(!patterns.is_empty());
        let captures = patterns[0].captures("We need to finish the report today.");
        let action = captures.and_then(|caps| caps.get(1)).map(|m| m.as_str());
        assert_eq!(action, Some("finish the report today"));
    }

    #[test]
    fn test_mention_pattern() {
        let pattern = Lexicon::mention_pattern().map(|re| re.captures("ping @alice please"));
        let name = pattern
            .flatten()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        assert_eq!(name, Some("alice"));
    }
}
