//! Keyword sentiment scoring.
//!
//! A bag-of-words lookup against a [`Lexicon`]. Handlers only see the
//! [`SentimentModel`] trait, so the lexicon or the whole scorer can be swapped.

pub mod lexicon;
pub mod routes;

use serde::Serialize;

pub use lexicon::Lexicon;

pub const MAX_BATCH_SIZE: usize = 100;
const NEUTRAL_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub positive_score: usize,
    pub negative_score: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub labels: Vec<Sentiment>,
    pub positive_words: usize,
    pub negative_words: usize,
    pub max_batch_size: usize,
}

pub trait SentimentModel: Send + Sync {
    fn predict(&self, text: &str) -> Prediction;
    fn info(&self) -> ModelInfo;
}

/// Lowercases and keeps only ASCII letters and whitespace.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// Rounds to two decimals, ties to even, on the exact binary value of `value`
/// (0.475 is stored just below the half and rounds down to 0.47).
fn round2(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return value;
    }

    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    // value == mantissa / 2^shift
    let (mantissa, shift) = if exponent == 0 {
        (fraction, 1074)
    } else {
        (fraction | (1u64 << 52), 1075 - exponent)
    };
    if shift <= 0 {
        return value;
    }
    if shift >= 120 {
        return 0.0;
    }

    let scaled = u128::from(mantissa) * 100;
    let quotient = scaled >> shift;
    let remainder = scaled - (quotient << shift);
    let half = 1u128 << (shift - 1);
    let rounded = if remainder > half || (remainder == half && quotient & 1 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded as f64 / 100.0
}

#[derive(Debug, Clone, Default)]
pub struct KeywordModel {
    lexicon: Lexicon,
}

impl KeywordModel {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }
}

impl SentimentModel for KeywordModel {
    fn predict(&self, text: &str) -> Prediction {
        let normalized = normalize(text);
        let tokens = tokenize(&normalized);

        let positive_score = tokens.iter().filter(|t| self.lexicon.is_positive(t)).count();
        let negative_score = tokens.iter().filter(|t| self.lexicon.is_negative(t)).count();

        let sentiment = match positive_score.cmp(&negative_score) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        };

        let confidence = match sentiment {
            Sentiment::Neutral => NEUTRAL_CONFIDENCE,
            _ => {
                let hits = (positive_score + negative_score) as f64;
                let ratio = hits / tokens.len().max(1) as f64;
                round2((ratio + 0.1).min(MAX_CONFIDENCE))
            }
        };

        Prediction {
            sentiment,
            confidence,
            positive_score,
            negative_score,
        }
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_name: "Keyword Sentiment Analyzer".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_type: "keyword-based".to_string(),
            labels: vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral],
            positive_words: self.lexicon.positive_len(),
            negative_words: self.lexicon.negative_len(),
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn model() -> KeywordModel {
        KeywordModel::default()
    }

    #[test]
    fn normalize_strips_punctuation_and_digits() {
        assert_eq!(normalize("It's GREAT!!! 10/10"), "its great ");
    }

    #[test]
    fn product_review_is_positive() {
        let p = model().predict("I love this product! It works amazingly well.");
        assert_eq!(p.sentiment, Sentiment::Positive);
        assert!(p.positive_score > p.negative_score);
        assert_eq!(p.negative_score, 0);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("the table is made of wood")]
    #[case("good but bad")]
    #[case("great awful love hate")]
    fn ties_are_neutral_with_fixed_confidence(#[case] text: &str) {
        let p = model().predict(text);
        assert_eq!(p.sentiment, Sentiment::Neutral);
        assert_eq!(p.confidence, 0.5);
        assert_eq!(p.positive_score, p.negative_score);
    }

    #[test]
    fn confidence_is_capped_at_point_nine() {
        let p = model().predict("terrible awful horrible");
        assert_eq!(p.sentiment, Sentiment::Negative);
        assert_eq!(p.negative_score, 3);
        assert_eq!(p.confidence, 0.9);
    }

    #[rstest]
    #[case(3, 8, 0.47)]
    #[case(5, 8, 0.72)]
    #[case(1, 40, 0.12)]
    #[case(1, 8, 0.23)]
    #[case(3, 40, 0.17)]
    fn confidence_rounds_half_way_ratios_like_decimal_rounding(
        #[case] hits: usize,
        #[case] tokens: usize,
        #[case] expected: f64,
    ) {
        let mut words = vec!["good"; hits];
        words.extend(std::iter::repeat("x").take(tokens - hits));
        let p = model().predict(&words.join(" "));
        assert_eq!(p.positive_score, hits);
        assert_eq!(p.confidence, expected);
    }

    #[test]
    fn round2_handles_exact_ties_and_edges() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.9), 0.9);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn confidence_follows_hit_ratio() {
        // 1 hit out of 4 tokens: 0.25 + 0.1
        let p = model().predict("this is really bad");
        assert_eq!(p.sentiment, Sentiment::Negative);
        assert_eq!(p.confidence, 0.35);

        // 1 hit out of 3 tokens: 0.333.. + 0.1, rounded
        let p = model().predict("what a nice");
        assert_eq!(p.confidence, 0.43);
    }

    #[test]
    fn predict_is_deterministic() {
        let m = model();
        let text = "Great service, but the food was cold and slow.";
        assert_eq!(m.predict(text), m.predict(text));
    }

    #[test]
    fn custom_lexicon_changes_scores() {
        let m = KeywordModel::new(Lexicon::new(["cold"], ["warm"]).unwrap());
        let p = m.predict("Served cold, just how I like it");
        assert_eq!(p.sentiment, Sentiment::Positive);
        assert_eq!(p.positive_score, 1);
        assert_eq!(m.info().positive_words, 1);
    }

    #[test]
    fn sentiment_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sentiment::Neutral).unwrap(), "\"neutral\"");
    }
}
