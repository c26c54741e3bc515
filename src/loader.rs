//! One-time population of the word store from the remote word source.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::WordApiError;
use crate::store::{WordStore, FALLBACK_LANGUAGE};

/// Languages fetched from per-language URLs after the primary list.
pub const SECONDARY_LANGUAGES: [&str; 6] = ["es", "it", "de", "fr", "zh", "pt-br"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LoadState {
    Unloaded = 0,
    Loading = 1,
    Loaded = 2,
}

impl LoadState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoadState::Unloaded,
            1 => LoadState::Loading,
            _ => LoadState::Loaded,
        }
    }
}

/// Remote source of JSON word lists.
#[derive(Debug, Clone)]
pub struct WordSource {
    client: reqwest::Client,
    primary_url: String,
    language_url: String,
}

impl WordSource {
    /// `language_url` must contain a `{lang}` placeholder.
    pub fn new(client: reqwest::Client, primary_url: String, language_url: String) -> Self {
        Self {
            client,
            primary_url,
            language_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            reqwest::Client::new(),
            config.primary_url.clone(),
            config.language_url.clone(),
        )
    }

    pub fn url_for(&self, lang: &str) -> String {
        if lang == FALLBACK_LANGUAGE {
            self.primary_url.clone()
        } else {
            self.language_url.replace("{lang}", lang)
        }
    }

    /// Fetch and decode one word list
    pub async fn fetch(&self, lang: &str) -> Result<Vec<String>, WordApiError> {
        let url = self.url_for(lang);
        let upstream = |reason: String| WordApiError::UpstreamLoad {
            url: url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| upstream(e.to_string()))?
            .error_for_status()
            .map_err(|e| upstream(e.to_string()))?;

        let words: Vec<String> = response
            .json()
            .await
            .map_err(|e| upstream(format!("malformed payload: {e}")))?;

        if words.is_empty() {
            return Err(upstream("empty word list".to_string()));
        }

        Ok(words)
    }
}

/// Resets the state to `Unloaded` when the loading request is dropped
/// before the load completes, so the next data request retries it.
struct LoadingGuard<'a> {
    state: &'a AtomicU8,
    finished: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.store(LoadState::Unloaded as u8, Ordering::Release);
            tracing::warn!("Word list load cancelled before completion");
        }
    }
}

/// Lazily loads every known language into a [`WordStore`], at most once.
#[derive(Debug)]
pub struct Loader {
    source: WordSource,
    state: AtomicU8,
    gate: Mutex<()>,
}

impl Loader {
    pub fn new(source: WordSource) -> Self {
        Self {
            source,
            state: AtomicU8::new(LoadState::Unloaded as u8),
            gate: Mutex::new(()),
        }
    }

    pub fn state(&self) -> LoadState {
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Load the store unless a load already completed. Concurrent callers
    /// wait for the in-flight load instead of starting another.
    pub async fn ensure_loaded(&self, store: &WordStore) {
        if self.state() == LoadState::Loaded {
            return;
        }

        let _guard = self.gate.lock().await;
        if self.state() == LoadState::Loaded {
            return;
        }

        self.state.store(LoadState::Loading as u8, Ordering::Release);
        let mut loading = LoadingGuard {
            state: &self.state,
            finished: false,
        };
        self.load_all(store).await;
        self.state.store(LoadState::Loaded as u8, Ordering::Release);
        loading.finished = true;
    }

    async fn load_all(&self, store: &WordStore) {
        tracing::info!("Loading word lists");

        let mut loaded = 0usize;
        let languages = std::iter::once(FALLBACK_LANGUAGE).chain(SECONDARY_LANGUAGES);
        for lang in languages {
            match self.source.fetch(lang).await {
                Ok(words) => {
                    tracing::debug!(lang, words = words.len(), "Loaded word list");
                    store.set_words(lang, words);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(lang, error = %e, "Keeping previous word list");
                }
            }
        }

        store.refresh_languages();
        tracing::info!(
            loaded,
            available = ?store.languages(),
            "Word lists ready"
        );
    }
}
