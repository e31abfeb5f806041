use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::error::{AppError, Result};

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "amazingly", "awesome", "fantastic", "wonderful",
    "love", "loved", "loves", "like", "liked", "best", "perfect", "happy", "glad", "pleased",
    "brilliant", "outstanding", "superb", "nice", "beautiful", "enjoy", "enjoyed", "recommend",
    "positive", "delightful", "impressive", "satisfied", "fast", "helpful", "friendly", "easy",
    "reliable", "incredible", "exceptional", "favorite", "fun", "worth",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "hate", "hated", "hates", "dislike",
    "poor", "disappointing", "disappointed", "broken", "useless", "slow", "angry", "sad",
    "annoying", "frustrating", "ugly", "boring", "negative", "waste", "wasted", "problem",
    "problems", "fail", "failed", "fails", "difficult", "hard", "rude", "expensive", "buggy",
    "crash", "crashed", "refund", "unhappy", "mediocre", "never",
];

static ENGLISH: Lazy<Lexicon> = Lazy::new(|| Lexicon {
    positive: POSITIVE_WORDS.iter().map(|w| w.to_string()).collect(),
    negative: NEGATIVE_WORDS.iter().map(|w| w.to_string()).collect(),
});

/// Two disjoint sets of lowercase words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl Lexicon {
    pub fn new<P, N, S>(positive: P, negative: N) -> Result<Self>
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positive: HashSet<String> = positive
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let negative: HashSet<String> = negative
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if let Some(word) = positive.intersection(&negative).next() {
            return Err(AppError::config(format!(
                "Lexicon word '{}' is both positive and negative",
                word
            )));
        }

        Ok(Self { positive, negative })
    }

    /// Built-in English word lists.
    pub fn english() -> Self {
        ENGLISH.clone()
    }

    pub fn is_positive(&self, token: &str) -> bool {
        self.positive.contains(token)
    }

    pub fn is_negative(&self, token: &str) -> bool {
        self.negative.contains(token)
    }

    pub fn positive_len(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_len(&self) -> usize {
        self.negative.len()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}
