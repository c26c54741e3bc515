//! Random word selection with length and difficulty filters.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, WordApiError};
use crate::store::{WordStore, FALLBACK_LANGUAGE};

pub const MIN_COUNT: usize = 1;
pub const MAX_COUNT: usize = 100;

/// Difficulty bucketing only applies to requests this small.
const DIFFICULTY_MAX_COUNT: usize = 5;
const DIFFICULTY_BUCKET_FACTOR: usize = 10;

/// A parsed `/word` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordQuery {
    pub lang: String,
    pub count: usize,
    pub length: Option<usize>,
    pub difficulty: Option<u8>,
}

impl WordQuery {
    /// Build a query from raw query-string values, falling back to defaults
    /// for anything missing or unparseable.
    pub fn from_params(
        number: Option<&str>,
        length: Option<&str>,
        lang: Option<&str>,
        diff: Option<&str>,
    ) -> Self {
        let count = parse_int(number)
            .unwrap_or(MIN_COUNT as i64)
            .clamp(MIN_COUNT as i64, MAX_COUNT as i64) as usize;
        let length = parse_int(length).filter(|&l| l >= 1).map(|l| l as usize);
        let difficulty = parse_int(diff)
            .filter(|d| (1..=5).contains(d))
            .map(|d| d as u8);
        let lang = lang
            .filter(|l| !l.is_empty())
            .unwrap_or(FALLBACK_LANGUAGE)
            .to_string();

        Self {
            lang,
            count,
            length,
            difficulty,
        }
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Look up the query's language and pick words from it.
pub fn pick_words<R: Rng + ?Sized>(
    store: &WordStore,
    query: &WordQuery,
    rng: &mut R,
) -> Result<Vec<String>> {
    let words = store
        .words(&query.lang)
        .ok_or_else(|| WordApiError::UnknownLanguage(query.lang.clone()))?;

    select_words(&words, query, rng)
}

/// Filter by length, shuffle, apply the difficulty bucket and take `count`.
pub fn select_words<R: Rng + ?Sized>(
    words: &[String],
    query: &WordQuery,
    rng: &mut R,
) -> Result<Vec<String>> {
    let mut candidates: Vec<&String> = match query.length {
        Some(length) => {
            let filtered: Vec<&String> = words
                .iter()
                .filter(|w| w.chars().count() == length)
                .collect();
            if filtered.is_empty() {
                return Err(WordApiError::NoWordsOfLength(length));
            }
            filtered
        }
        None => words.iter().collect(),
    };

    candidates.shuffle(rng);

    // Placeholder heuristic: a narrower pool for small requests, not a real
    // difficulty score.
    if query.difficulty.is_some() && query.count <= DIFFICULTY_MAX_COUNT {
        candidates.truncate(query.count * DIFFICULTY_BUCKET_FACTOR);
        candidates.shuffle(rng);
    }

    Ok(candidates
        .into_iter()
        .take(query.count)
        .cloned()
        .collect())
}
