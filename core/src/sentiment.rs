//! Lexicon-based review sentiment.
//!
//! Reviews are scored once, when they enter the dataset, and the result is
//! stored next to the review text. Dashboard requests never rescore.
//!
//! Scoring:
//!   1. Tokens are looked up in a valence lexicon (scale -4..=4).
//!   2. An intensifier directly before a token scales its valence.
//!   3. A negation within the three preceding tokens flips and damps it.
//!   4. Clauses before "but" are halved, clauses after it weighted 1.5x.
//!   5. Each '!' (max four) pushes the sum further from zero.
//!   6. The sum is normalised into [-1, 1] as `s / sqrt(s^2 + 15)`.

use crate::{config::SentimentConfig, model::SentimentLabel};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const NEGATION_SCALAR: f64 = -0.74;
const NEGATION_WINDOW: usize = 3;
const BUT_BEFORE: f64 = 0.5;
const BUT_AFTER: f64 = 1.5;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NORMALIZATION_ALPHA: f64 = 15.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SentimentScore {
    /// Polarity in [-1, 1].
    pub score: f64,
    pub label: SentimentLabel,
}

/// Anything that can turn free text into a polarity score.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentScore;
}

pub struct LexiconScorer {
    valences:     HashMap<&'static str, f64>,
    negations:    HashSet<&'static str>,
    intensifiers: HashMap<&'static str, f64>,
    positive_threshold: f64,
    negative_threshold: f64,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(&SentimentConfig {
            positive_threshold: 0.05,
            negative_threshold: -0.05,
        })
    }
}

impl LexiconScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        Self {
            valences: VALENCES.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            positive_threshold: config.positive_threshold,
            negative_threshold: config.negative_threshold,
        }
    }

    pub fn label_for(&self, score: f64) -> SentimentLabel {
        if score >= self.positive_threshold {
            SentimentLabel::Positive
        } else if score <= self.negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    fn raw_valence(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let but_at = tokens.iter().position(|t| *t == "but");

        let mut sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.valences.get(token) else {
                continue;
            };
            let mut v = base;

            if i > 0 {
                if let Some(&boost) = self.intensifiers.get(tokens[i - 1]) {
                    v *= boost;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i].iter().any(|t| self.negations.contains(t)) {
                v *= NEGATION_SCALAR;
            }

            if let Some(b) = but_at {
                v *= if i < b { BUT_BEFORE } else { BUT_AFTER };
            }

            sum += v;
        }

        if sum != 0.0 {
            let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
            sum += sum.signum() * bangs * EXCLAMATION_BOOST;
        }
        sum
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentScore {
        let raw = self.raw_valence(text);
        let score = (raw / (raw * raw + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);
        SentimentScore { score, label: self.label_for(score) }
    }
}

const VALENCES: &[(&str, f64)] = &[
    // positive
    ("excellent", 3.2),
    ("amazing", 2.8),
    ("great", 3.1),
    ("perfect", 2.7),
    ("outstanding", 3.0),
    ("satisfied", 1.8),
    ("recommended", 1.5),
    ("recommend", 1.5),
    ("professional", 1.9),
    ("smooth", 1.3),
    ("exceeded", 1.4),
    ("good", 1.9),
    ("fine", 0.8),
    ("okay", 0.9),
    ("ok", 0.9),
    ("decent", 0.9),
    ("reasonable", 0.8),
    ("fair", 1.3),
    ("impressive", 2.3),
    ("better", 1.9),
    ("special", 1.7),
    ("quick", 1.0),
    ("fast", 0.9),
    ("love", 3.2),
    ("happy", 2.7),
    ("value", 1.0),
    ("works", 0.6),
    // negative
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("terrible", -2.1),
    ("waste", -1.8),
    ("slow", -0.9),
    ("poor", -2.1),
    ("damaged", -1.6),
    ("unresponsive", -1.2),
    ("scam", -2.9),
    ("bad", -2.5),
    ("avoid", -1.2),
    ("complaints", -1.6),
    ("broken", -1.9),
    ("awful", -2.8),
    ("worst", -3.1),
    ("fraud", -2.8),
    ("late", -0.9),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nothing", "none", "cannot", "can't",
    "don't", "doesn't", "didn't", "won't", "wouldn't", "isn't", "wasn't",
    "aren't", "hardly", "barely", "without",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("totally", 1.3),
    ("slightly", 0.7),
    ("somewhat", 0.8),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LexiconScorer {
        LexiconScorer::default()
    }

    #[test]
    fn clear_praise_is_positive() {
        let s = scorer().score("Excellent product! Fast delivery and great quality.");
        assert_eq!(s.label, SentimentLabel::Positive);
        assert!(s.score > 0.5, "score = {}", s.score);
    }

    #[test]
    fn clear_complaint_is_negative() {
        let s = scorer().score("Complete scam, avoid this seller.");
        assert_eq!(s.label, SentimentLabel::Negative);
        assert!(s.score < -0.5, "score = {}", s.score);
    }

    #[test]
    fn text_without_lexicon_words_is_neutral() {
        let s = scorer().score("The parcel arrived on Tuesday.");
        assert_eq!(s.score, 0.0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn negation_flips_polarity() {
        let plain = scorer().score("bad experience");
        let negated = scorer().score("not bad experience");
        assert!(plain.score < 0.0);
        assert!(negated.score > 0.0);
    }

    #[test]
    fn intensifier_strengthens() {
        let plain = scorer().score("good seller");
        let boosted = scorer().score("very good seller");
        assert!(boosted.score > plain.score);
    }

    #[test]
    fn scores_stay_in_unit_range() {
        let s = scorer().score("excellent amazing great perfect outstanding love happy!!!!!");
        assert!((-1.0..=1.0).contains(&s.score));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let sc = scorer();
        assert_eq!(sc.label_for(0.05), SentimentLabel::Positive);
        assert_eq!(sc.label_for(-0.05), SentimentLabel::Negative);
        assert_eq!(sc.label_for(0.0499), SentimentLabel::Neutral);
    }
}
