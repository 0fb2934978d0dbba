//! Dictionary and polarity sentiment scoring with contextual adjustment.
//!
//! Homogeneous segments are scored directly: ideographic text by greedy
//! dictionary matching, alphabetic text by a lexicon sum blended with a
//! normalized polarity compound. Mixed text is segmented first and the
//! per-segment results combined as a length-weighted average.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation as _;

use crate::language::{Language, LanguageDetector};
use crate::lexicon::Lexicon;

/// Dictionary share of the blended alphabetic score.
const DICT_BLEND: f64 = 0.6;
/// Polarity-compound share of the blended alphabetic score.
const POLARITY_BLEND: f64 = 0.4;
/// Negation flips and dampens the raw score by this factor.
const NEGATION_FACTOR: f64 = -0.5;
/// Each intensifier amplifies the raw score by this increment.
const INTENSIFIER_STEP: f64 = 0.2;
/// Each emoticon shifts the raw score by this amount.
const EMOTICON_STEP: f64 = 0.1;
/// Comparative above this classifies positive; below its negation, negative.
const NEUTRAL_BAND: f64 = 0.1;
/// Upper bound on reported confidence.
const CONFIDENCE_CAP: f64 = 0.95;
/// Lower bound on neutral confidence.
const NEUTRAL_CONFIDENCE_FLOOR: f64 = 0.3;

/// Three-way sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Normalized score above the neutral band.
    Positive,
    /// Normalized score within the neutral band.
    Neutral,
    /// Normalized score below the neutral band.
    Negative,
}

impl Polarity {
    /// Lowercase label used in summaries and payloads.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Emotion categories tracked by the per-emotion breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    /// Happiness, excitement.
    Joy,
    /// Disappointment, grief.
    Sadness,
    /// Irritation through fury.
    Anger,
    /// Worry, anxiety.
    Fear,
    /// Astonishment.
    Surprise,
    /// Confidence, reliability.
    Trust,
}

impl Emotion {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "joy" => Some(Self::Joy),
            "sadness" => Some(Self::Sadness),
            "anger" => Some(Self::Anger),
            "fear" => Some(Self::Fear),
            "surprise" => Some(Self::Surprise),
            "trust" => Some(Self::Trust),
            _ => None,
        }
    }
}

/// Contextual signals found while scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextualFactors {
    /// A negation token was present.
    pub negation: bool,
    /// Intensifier tokens found, in order.
    pub intensifiers: Vec<String>,
    /// Emoticons found, in order.
    pub emoticons: Vec<String>,
}

/// Result of one sentiment analysis. Produced fresh per call; never mutated
/// afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Raw score; unbounded, typically within -5..+5.
    pub score: f64,
    /// Per-token normalized score.
    pub comparative: f64,
    /// Tokens that contributed positive weight.
    pub positive: Vec<String>,
    /// Tokens that contributed negative weight.
    pub negative: Vec<String>,
    /// Three-way classification on the comparative score.
    pub classification: Polarity,
    /// Classification confidence in 0..1.
    pub confidence: f64,
    /// Per-emotion intensity breakdown.
    pub emotions: HashMap<Emotion, f64>,
    /// Contextual signals applied during adjustment.
    pub context: ContextualFactors,
}

/// Lexicon-driven sentiment scorer.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    lexicon: Lexicon,
    detector: LanguageDetector,
}

impl SentimentScorer {
    /// Creates a scorer over a custom lexicon.
    #[must_use]
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            detector: LanguageDetector,
        }
    }

    /// Analyzes a text, segmenting mixed-language input and blending the
    /// per-segment scores by length weight.
    #[must_use]
    pub fn analyze(&self, text: &str) -> SentimentResult {
        let detection = self.detector.detect(text);

        if detection.language == Language::Mixed {
            let segments = self.detector.segment(text);
            let scored: Vec<(usize, SentimentResult)> = segments
                .iter()
                .map(|segment| {
                    (
                        segment.text.chars().count(),
                        self.score_segment(&segment.text, segment.language),
                    )
                })
                .collect();
            return blend(scored);
        }

        let language = match detection.language {
            Language::Zh => Language::Zh,
            Language::En | Language::Mixed => Language::En,
        };
        self.score_segment(text, language)
    }

    /// Scores one homogeneous-language segment.
    #[must_use]
    pub fn score_segment(&self, text: &str, language: Language) -> SentimentResult {
        let tokens = match language {
            Language::Zh => self.tokenize_ideographic(text),
            Language::En | Language::Mixed => tokenize_alphabetic(text),
        };

        let mut dict_score = 0.0;
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        let mut emotions: HashMap<Emotion, f64> = HashMap::new();
        let mut intensifiers = Vec::new();
        let mut negation = false;

        for token in &tokens {
            let weight = match language {
                Language::Zh => self.lexicon.zh_weight(token),
                Language::En | Language::Mixed => self.lexicon.en_weight(token),
            };
            if let Some(weight) = weight {
                dict_score += weight;
                if weight > 0.0 {
                    positive.push(token.clone());
                } else {
                    negative.push(token.clone());
                }
            }

            if self.lexicon.is_negation(token) {
                negation = true;
            }
            if self.lexicon.is_intensifier(token) {
                intensifiers.push(token.clone());
            }
            if let Some((label, intensity)) = self.lexicon.emotion(token) {
                if let Some(emotion) = Emotion::from_label(label) {
                    *emotions.entry(emotion).or_insert(0.0) += intensity;
                }
            }
        }

        // Alphabetic text gets the generic polarity compound blended in;
        // dictionary weighting stands alone for ideographic text.
        let mut score = match language {
            Language::En | Language::Mixed => {
                DICT_BLEND * dict_score + POLARITY_BLEND * compound(dict_score)
            }
            Language::Zh => dict_score,
        };

        let emoticons = self.lexicon.emoticons_in(text);

        // Contextual adjustment, in fixed order.
        if negation {
            score *= NEGATION_FACTOR;
        }
        if !intensifiers.is_empty() {
            score *= 1.0 + INTENSIFIER_STEP * intensifiers.len() as f64;
        }
        if !emoticons.is_empty() {
            score += EMOTICON_STEP * emoticons.len() as f64;
        }

        let token_count = tokens.len().max(1);
        let comparative = score / token_count as f64;

        let classification = if comparative > NEUTRAL_BAND {
            Polarity::Positive
        } else if comparative < -NEUTRAL_BAND {
            Polarity::Negative
        } else {
            Polarity::Neutral
        };

        let mut confidence = (comparative.abs() * 2.0).min(CONFIDENCE_CAP);
        if classification == Polarity::Neutral {
            confidence = confidence.max(NEUTRAL_CONFIDENCE_FLOOR);
        }

        for intensity in emotions.values_mut() {
            *intensity /= token_count as f64;
        }

        SentimentResult {
            score,
            comparative,
            positive,
            negative,
            classification,
            confidence,
            emotions,
            context: ContextualFactors {
                negation,
                intensifiers,
                emoticons,
            },
        }
    }

    /// Greedy longest-match dictionary segmentation for ideographic text.
    fn tokenize_ideographic(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text
            .unicode_words()
            .flat_map(|word| word.chars())
            .collect();
        let max_len = self.lexicon.zh_max_word().max(2);

        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            let mut matched = None;
            let upper = max_len.min(chars.len() - pos);
            for window in (1..=upper).rev() {
                let candidate: String = chars[pos..pos + window].iter().collect();
                if self.lexicon.zh_weight(&candidate).is_some()
                    || self.lexicon.is_negation(&candidate)
                    || self.lexicon.is_intensifier(&candidate)
                    || self.lexicon.emotion(&candidate).is_some()
                {
                    matched = Some((candidate, window));
                    break;
                }
            }
            match matched {
                Some((token, window)) => {
                    tokens.push(token);
                    pos += window;
                }
                None => {
                    tokens.push(chars[pos].to_string());
                    pos += 1;
                }
            }
        }
        tokens
    }
}

/// Word-boundary tokenization for alphabetic text; apostrophes survive so
/// contracted negations stay intact.
fn tokenize_alphabetic(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|ch: char| !ch.is_alphanumeric() && ch != '\'')
                .to_owned()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Normalized polarity compound in [-1, 1].
fn compound(raw: f64) -> f64 {
    raw / (raw * raw + 15.0).sqrt()
}

/// Length-weighted blend of per-segment results; token lists and contextual
/// factors are unioned rather than averaged.
fn blend(scored: Vec<(usize, SentimentResult)>) -> SentimentResult {
    let total: usize = scored.iter().map(|(len, _)| *len).sum();
    if total == 0 {
        return SentimentScorer::default().score_segment("", Language::En);
    }

    let mut score = 0.0;
    let mut comparative = 0.0;
    let mut confidence = 0.0;
    let mut emotions: HashMap<Emotion, f64> = HashMap::new();
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    let mut context = ContextualFactors::default();

    for (len, result) in scored {
        let weight = len as f64 / total as f64;
        score += weight * result.score;
        comparative += weight * result.comparative;
        confidence += weight * result.confidence;
        for (emotion, intensity) in result.emotions {
            *emotions.entry(emotion).or_insert(0.0) += weight * intensity;
        }
        for token in result.positive {
            if !positive.contains(&token) {
                positive.push(token);
            }
        }
        for token in result.negative {
            if !negative.contains(&token) {
                negative.push(token);
            }
        }
        context.negation |= result.context.negation;
        context.intensifiers.extend(result.context.intensifiers);
        context.emoticons.extend(result.context.emoticons);
    }

    let classification = if comparative > NEUTRAL_BAND {
        Polarity::Positive
    } else if comparative < -NEUTRAL_BAND {
        Polarity::Negative
    } else {
        Polarity::Neutral
    };
    if classification == Polarity::Neutral {
        confidence = confidence.max(NEUTRAL_CONFIDENCE_FLOOR);
    }

    SentimentResult {
        score,
        comparative,
        positive,
        negative,
        classification,
        confidence: confidence.min(CONFIDENCE_CAP),
        emotions,
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_english() {
        let result = SentimentScorer::default().analyze("the release went great, thanks all");
        assert_eq!(result.classification, Polarity::Positive);
        assert!(result.score > 0.0);
        assert!(result.positive.contains(&"great".to_owned()));
    }

    #[test]
    fn test_negative_english() {
        let result = SentimentScorer::default().analyze("this is a terrible, broken mess");
        assert_eq!(result.classification, Polarity::Negative);
        assert!(result.score < 0.0);
        assert!(result.negative.contains(&"terrible".to_owned()));
    }

    #[test]
    fn test_neutral_has_confidence_floor() {
        let result = SentimentScorer::default().analyze("the data lives in the second table");
        assert_eq!(result.classification, Polarity::Neutral);
        assert!(result.confidence >= NEUTRAL_CONFIDENCE_FLOOR);
    }

    #[test]
    fn test_appending_positive_token_never_decreases_score() {
        let scorer = SentimentScorer::default();
        let base = scorer.analyze("the data lives in the second table");
        let boosted = scorer.analyze("the data lives in the second table wonderful");
        assert!(
            boosted.score >= base.score,
            "appending a strongly-positive token must not decrease the score"
        );
        assert_eq!(boosted.classification, Polarity::Positive);
    }

    #[test]
    fn test_negation_flips_score() {
        let scorer = SentimentScorer::default();
        let plain = scorer.analyze("this is good");
        let negated = scorer.analyze("this is not good");
        assert!(plain.score > 0.0);
        assert!(negated.score < 0.0);
        assert!(negated.context.negation);
    }

    #[test]
    fn test_intensifier_amplifies() {
        let scorer = SentimentScorer::default();
        let plain = scorer.analyze("good work");
        let intense = scorer.analyze("really very good work");
        assert!(intense.score > plain.score);
        assert_eq!(intense.context.intensifiers.len(), 2);
    }

    #[test]
    fn test_emoticons_shift_score() {
        let scorer = SentimentScorer::default();
        let plain = scorer.analyze("shipped the build");
        let smiley = scorer.analyze("shipped the build :)");
        assert!(smiley.score > plain.score);
        assert_eq!(smiley.context.emoticons, vec![":)".to_owned()]);
    }

    #[test]
    fn test_chinese_dictionary_scoring() {
        let result = SentimentScorer::default().analyze("这次发布非常顺利,大家辛苦了");
        assert!(result.score > 0.0);
        assert!(result.positive.contains(&"顺利".to_owned()));
        assert!(!result.context.intensifiers.is_empty());
    }

    #[test]
    fn test_mixed_language_blend_positive() {
        // One purely positive ideographic segment plus one purely positive
        // alphabetic segment must classify positive overall.
        let result = SentimentScorer::default().analyze("这次发布很成功大家很开心很顺利 great work");
        assert_eq!(result.classification, Polarity::Positive);
        assert!(result.positive.iter().any(|token| token == "great"));
        assert!(result.positive.iter().any(|token| token == "成功"));
    }

    #[test]
    fn test_emotion_breakdown() {
        let result = SentimentScorer::default().analyze("so happy and excited about this");
        assert!(result.emotions.contains_key(&Emotion::Joy));
    }

    #[test]
    fn test_confidence_capped() {
        let result = SentimentScorer::default().analyze("amazing wonderful fantastic brilliant");
        assert!(result.confidence <= CONFIDENCE_CAP);
    }
}
