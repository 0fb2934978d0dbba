//! Script-ratio language detection and exact segmentation.
//!
//! Classification is a coarse character-class measurement, not a statistical
//! model: ideographic and alphabetic ratios over total length decide the tag,
//! and segmentation splits mixed text into homogeneous runs whose spans
//! exactly reconstruct the input. The sentiment scorer depends on that
//! partition property for length-weighted blending.

use serde::{Deserialize, Serialize};

/// Dominant ideographic share above which mixed text is considered.
const MIXED_IDEOGRAPHIC_THRESHOLD: f64 = 0.3;
/// Alphabetic share above which mixed text is considered.
const MIXED_ALPHABETIC_THRESHOLD: f64 = 0.1;
/// Confidence scale factor applied to the dominant ratio.
const CONFIDENCE_SCALE: f64 = 1.2;
/// Upper bound on reported confidence.
const CONFIDENCE_CAP: f64 = 0.95;

/// Coarse language tag assigned to a text or segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Alphabetic-script text; scored with the combined polarity algorithm.
    En,
    /// Ideographic-script text (CJK); scored by dictionary weighting.
    Zh,
    /// Both scripts present above threshold; scored per segment and blended.
    Mixed,
}

/// Outcome of language detection over a whole text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetection {
    /// Assigned tag.
    pub language: Language,
    /// Detection confidence, capped at 0.95.
    pub confidence: f64,
    /// Share of ideographic characters over total length.
    pub ideographic_ratio: f64,
    /// Share of alphabetic characters over total length.
    pub alphabetic_ratio: f64,
}

/// One homogeneous-language span of a parent text.
///
/// Segments partition the parent without gaps or overlaps; offsets are byte
/// positions into the original string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSegment {
    /// The span's text.
    pub text: String,
    /// Tag of the run; always `En` or `Zh`, never `Mixed`.
    pub language: Language,
    /// Byte offset of the span start in the parent.
    pub start: usize,
    /// Byte offset one past the span end in the parent.
    pub end: usize,
}

/// Character-class language detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    /// Classifies the dominant script mixture of a text.
    #[must_use]
    pub fn detect(&self, text: &str) -> LanguageDetection {
        let total = text.chars().count();
        if total == 0 {
            return LanguageDetection {
                language: Language::En,
                confidence: 0.0,
                ideographic_ratio: 0.0,
                alphabetic_ratio: 0.0,
            };
        }

        let ideographic = text.chars().filter(|ch| is_ideographic(*ch)).count();
        let alphabetic = text.chars().filter(|ch| ch.is_ascii_alphabetic()).count();
        let ideographic_ratio = ideographic as f64 / total as f64;
        let alphabetic_ratio = alphabetic as f64 / total as f64;

        let (language, dominant) = if ideographic_ratio > MIXED_IDEOGRAPHIC_THRESHOLD
            && alphabetic_ratio > MIXED_ALPHABETIC_THRESHOLD
        {
            (Language::Mixed, ideographic_ratio.max(alphabetic_ratio))
        } else if ideographic_ratio > alphabetic_ratio {
            (Language::Zh, ideographic_ratio)
        } else {
            (Language::En, alphabetic_ratio)
        };

        LanguageDetection {
            language,
            confidence: (dominant * CONFIDENCE_SCALE).min(CONFIDENCE_CAP),
            ideographic_ratio,
            alphabetic_ratio,
        }
    }

    /// Splits a text into homogeneous-language runs.
    ///
    /// The current language flips only when a character of the opposite class
    /// appears; whitespace, punctuation, and digits attach to the current
    /// run. The returned spans exactly reconstruct the input.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<LanguageSegment> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut segments = Vec::new();
        let mut current: Option<Language> = None;
        let mut run_start = 0;

        for (idx, ch) in text.char_indices() {
            let class = classify_char(ch);
            let Some(class) = class else { continue };

            match current {
                None => current = Some(class),
                Some(lang) if lang != class => {
                    segments.push(LanguageSegment {
                        text: text[run_start..idx].to_owned(),
                        language: lang,
                        start: run_start,
                        end: idx,
                    });
                    run_start = idx;
                    current = Some(class);
                }
                Some(_) => {}
            }
        }

        segments.push(LanguageSegment {
            text: text[run_start..].to_owned(),
            language: current.unwrap_or(Language::En),
            start: run_start,
            end: text.len(),
        });

        segments
    }
}

/// Whether a char belongs to the ideographic class.
///
/// Covers the CJK unified ideograph blocks plus kana, which ride along with
/// kanji in Japanese text and are scored by the same dictionary path.
#[must_use]
pub fn is_ideographic(ch: char) -> bool {
    matches!(
        ch as u32,
        0x4E00..=0x9FFF        // CJK unified ideographs
        | 0x3400..=0x4DBF      // extension A
        | 0xF900..=0xFAFF      // compatibility ideographs
        | 0x3040..=0x309F      // hiragana
        | 0x30A0..=0x30FF      // katakana
    )
}

fn classify_char(ch: char) -> Option<Language> {
    if is_ideographic(ch) {
        Some(Language::Zh)
    } else if ch.is_ascii_alphabetic() {
        Some(Language::En)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        let detection = LanguageDetector.detect("the deploy went great, thanks everyone");
        assert_eq!(detection.language, Language::En);
        assert!(detection.confidence > 0.5);
        assert!(detection.ideographic_ratio < 0.01);
    }

    #[test]
    fn test_detect_chinese() {
        let detection = LanguageDetector.detect("这次发布非常顺利");
        assert_eq!(detection.language, Language::Zh);
        assert!(detection.confidence > 0.9);
    }

    #[test]
    fn test_detect_mixed() {
        let detection = LanguageDetector.detect("发布顺利 great work 大家辛苦了");
        assert_eq!(detection.language, Language::Mixed);
        assert!(detection.ideographic_ratio > MIXED_IDEOGRAPHIC_THRESHOLD);
        assert!(detection.alphabetic_ratio > MIXED_ALPHABETIC_THRESHOLD);
    }

    #[test]
    fn test_confidence_capped() {
        let detection = LanguageDetector.detect("purealphabetictext");
        assert!(detection.confidence <= CONFIDENCE_CAP);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(LanguageDetector.detect("").confidence, 0.0);
        assert!(LanguageDetector.segment("").is_empty());
    }

    #[test]
    fn test_segments_partition_exactly() {
        let text = "发布顺利, great work! 大家辛苦了";
        let segments = LanguageDetector.segment(text);

        assert!(segments.len() >= 3);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments.last().map(|seg| seg.end), Some(text.len()));
        for window in segments.windows(2) {
            assert_eq!(window[0].end, window[1].start, "no gaps or overlaps");
        }

        let rebuilt: String = segments.iter().map(|seg| seg.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_punctuation_does_not_flip() {
        let segments = LanguageDetector.segment("great, really great!");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].language, Language::En);
    }

    #[test]
    fn test_no_classifiable_chars_defaults_alphabetic() {
        let segments = LanguageDetector.segment("1234 !!");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].language, Language::En);
    }
}
