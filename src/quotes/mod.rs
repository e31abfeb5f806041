//! Quote-of-the-day selection.
//!
//! The daily pick is a pure function of the date key: a generator is built
//! locally from a stable hash of the key, so no process-wide RNG is reseeded.

pub mod routes;

use chrono::Local;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

static BUILTIN_QUOTES: Lazy<Vec<Quote>> = Lazy::new(|| {
    [
        ("The only way to do great work is to love what you do.", "Steve Jobs"),
        ("Simplicity is prerequisite for reliability.", "Edsger W. Dijkstra"),
        ("The best way to predict the future is to invent it.", "Alan Kay"),
        ("Talk is cheap. Show me the code.", "Linus Torvalds"),
        ("It always seems impossible until it's done.", "Nelson Mandela"),
        ("Whether you think you can or you think you can't, you're right.", "Henry Ford"),
        ("In the middle of difficulty lies opportunity.", "Albert Einstein"),
        ("First, solve the problem. Then, write the code.", "John Johnson"),
        ("Well begun is half done.", "Aristotle"),
        ("The secret of getting ahead is getting started.", "Mark Twain"),
        ("Programs must be written for people to read, and only incidentally for machines to execute.", "Harold Abelson"),
        ("Quality is not an act, it is a habit.", "Aristotle"),
        ("Life is what happens when you're busy making other plans.", "John Lennon"),
        ("Do what you can, with what you have, where you are.", "Theodore Roosevelt"),
        ("Stay hungry, stay foolish.", "Stewart Brand"),
    ]
    .into_iter()
    .map(|(text, author)| Quote::new(text, author))
    .collect()
});

/// Local calendar date in the `YYYY-MM-DD` form used as the daily key.
pub fn today_key() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// FNV-1a; stable across builds and platforms, unlike `DefaultHasher`.
fn stable_hash(key: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    key.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Index of the quote for `date_key` in a list of `len` quotes, or `None` if
/// the list is empty.
pub fn daily_index(date_key: &str, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(stable_hash(date_key));
    Some(rng.gen_range(0..len))
}

#[derive(Debug, Clone)]
pub struct QuoteBook {
    quotes: Vec<Quote>,
}

impl QuoteBook {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_QUOTES.clone())
    }

    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn daily(&self, date_key: &str) -> Result<&Quote> {
        daily_index(date_key, self.quotes.len())
            .map(|index| &self.quotes[index])
            .ok_or(AppError::NoQuotes)
    }

    pub fn random(&self) -> Result<&Quote> {
        self.quotes
            .choose(&mut rand::thread_rng())
            .ok_or(AppError::NoQuotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn same_date_yields_same_quote() {
        let book = QuoteBook::builtin();
        let first = book.daily("2024-03-15").unwrap().clone();
        for _ in 0..10 {
            assert_eq!(book.daily("2024-03-15").unwrap(), &first);
        }
    }

    #[test]
    fn daily_index_is_stable_and_in_range_over_a_year() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for offset in 0..366 {
            let key = (start + Duration::days(offset)).format("%Y-%m-%d").to_string();
            let index = daily_index(&key, 15).unwrap();
            assert!(index < 15);
            assert_eq!(daily_index(&key, 15), Some(index));
        }
    }

    #[test]
    fn different_dates_do_not_all_collapse_to_one_quote() {
        let picks: std::collections::HashSet<usize> = (1..=28)
            .map(|day| daily_index(&format!("2024-02-{:02}", day), 15).unwrap())
            .collect();
        assert!(picks.len() > 1);
    }

    #[test]
    fn daily_selection_leaves_random_draws_alone() {
        let book = QuoteBook::builtin();
        book.daily("2024-03-15").unwrap();
        let draws: std::collections::HashSet<String> = (0..200)
            .map(|_| book.random().unwrap().text.clone())
            .collect();
        assert!(draws.len() > 1);
    }

    #[test]
    fn empty_book_fails_explicitly() {
        let book = QuoteBook::new(Vec::new());
        assert_eq!(daily_index("2024-03-15", 0), None);
        assert!(matches!(book.daily("2024-03-15"), Err(AppError::NoQuotes)));
        assert!(matches!(book.random(), Err(AppError::NoQuotes)));
    }

    #[test]
    fn today_key_is_iso_date() {
        let key = today_key();
        assert!(NaiveDate::parse_from_str(&key, "%Y-%m-%d").is_ok());
    }
}
