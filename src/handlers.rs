use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{Result, WordApiError};
use crate::health::HealthStatus;
use crate::loader::{Loader, WordSource};
use crate::middleware::ClientId;
use crate::rate_limiter::RateLimiter;
use crate::selector::{self, WordQuery};
use crate::store::{WordStore, FALLBACK_LANGUAGE};

const HOME_PAGE: &str = include_str!("home.html");

/// Shared application state
pub type SharedState = Arc<AppState>;

/// Everything a request can touch: word lists, the loader that fills them
/// and the per-client rate limiter.
pub struct AppState {
    pub store: WordStore,
    pub loader: Loader,
    pub rate_limiter: RateLimiter,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(source: WordSource, rate_limit_window: Duration) -> Self {
        Self {
            store: WordStore::new(),
            loader: Loader::new(source),
            rate_limiter: RateLimiter::new(rate_limit_window),
            started_at: Instant::now(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(WordSource::from_config(config), config.rate_limit_window())
    }

    fn admit(&self, client: &ClientId) -> Result<()> {
        if self.rate_limiter.check_rate_limit(&client.0)? {
            Ok(())
        } else {
            Err(WordApiError::RateLimited)
        }
    }
}

/// Raw query pairs in request order; repeated keys are allowed.
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `key`, later repeats are ignored.
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AllParams {
    pub lang: Option<String>,
}

impl From<QueryPairs> for AllParams {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            lang: first_value(&pairs, "lang"),
        }
    }
}

/// Raw `/word` parameters; anything unparseable falls back to a default.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WordParams {
    pub number: Option<String>,
    pub length: Option<String>,
    pub lang: Option<String>,
    pub diff: Option<String>,
}

impl From<QueryPairs> for WordParams {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            number: first_value(&pairs, "number"),
            length: first_value(&pairs, "length"),
            lang: first_value(&pairs, "lang"),
            diff: first_value(&pairs, "diff"),
        }
    }
}

pub async fn redirect_home() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/home")])
}

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Available language codes
pub async fn languages(State(state): State<SharedState>) -> Json<Vec<String>> {
    Json(state.store.languages())
}

/// Full word list for one language
pub async fn all_words(
    State(state): State<SharedState>,
    client: ClientId,
    Query(pairs): Query<QueryPairs>,
) -> Result<Response> {
    state.admit(&client)?;

    let params = AllParams::from(pairs);
    let lang = params
        .lang
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());
    let words = state
        .store
        .words(&lang)
        .ok_or(WordApiError::UnknownLanguage(lang))?;

    Ok(Json(words.as_slice()).into_response())
}

/// Random words matching the requested filters
pub async fn random_word(
    State(state): State<SharedState>,
    client: ClientId,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<String>>> {
    state.admit(&client)?;

    let params = WordParams::from(pairs);
    let query = WordQuery::from_params(
        params.number.as_deref(),
        params.length.as_deref(),
        params.lang.as_deref(),
        params.diff.as_deref(),
    );
    let words = selector::pick_words(&state.store, &query, &mut rand::thread_rng())?;

    tracing::debug!(
        client_id = %client.0,
        lang = %query.lang,
        requested = query.count,
        returned = words.len(),
        "Picked words"
    );

    Ok(Json(words))
}

/// Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthStatus> {
    Json(HealthStatus::collect(&state))
}

pub async fn not_found() -> WordApiError {
    WordApiError::RouteNotFound
}
