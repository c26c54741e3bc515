//! In-memory word lists keyed by language code.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

pub type WordList = Arc<Vec<String>>;

/// Language served before (or instead of) any remote data.
pub const FALLBACK_LANGUAGE: &str = "en";

const FALLBACK_WORDS: [&str; 5] = ["hello", "sun", "example", "random", "api"];

#[derive(Debug)]
pub struct WordStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    lists: BTreeMap<String, WordList>,
    languages: Vec<String>,
}

impl WordStore {
    /// Create a store holding only the built-in fallback list.
    pub fn new() -> Self {
        let mut lists = BTreeMap::new();
        lists.insert(
            FALLBACK_LANGUAGE.to_string(),
            Arc::new(FALLBACK_WORDS.iter().map(|w| w.to_string()).collect()),
        );
        let languages = lists.keys().cloned().collect();

        Self {
            inner: RwLock::new(StoreInner { lists, languages }),
        }
    }

    /// Languages as of the last `refresh_languages`, sorted.
    pub fn languages(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .languages
            .clone()
    }

    pub fn words(&self, lang: &str) -> Option<WordList> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lists
            .get(lang)
            .cloned()
    }

    /// Replace the list for `lang` wholesale.
    pub fn set_words(&self, lang: &str, words: Vec<String>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.lists.insert(lang.to_string(), Arc::new(words));
    }

    /// Recompute the available languages from the stored keys.
    pub fn refresh_languages(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.languages = inner.lists.keys().cloned().collect();
    }
}

impl Default for WordStore {
    fn default() -> Self {
        Self::new()
    }
}
