use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::WordApiError;

/// Identifier used for clients whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Allows one request per client per window, measured from the client's
/// last admitted request.
#[derive(Clone)]
pub struct RateLimiter {
    window_ms: u64,
    last_seen: Arc<Mutex<HashMap<String, u64>>>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: window.as_millis() as u64,
            last_seen: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check and record a request from `client_id` at the current time
    pub fn check_rate_limit(&self, client_id: &str) -> Result<bool, WordApiError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        self.check_at(client_id, now)
    }

    /// Check and record a request from `client_id` at `now` (epoch ms)
    pub fn check_at(&self, client_id: &str, now: u64) -> Result<bool, WordApiError> {
        let client_id = if client_id.is_empty() {
            UNKNOWN_CLIENT
        } else {
            client_id
        };

        let mut last_seen = self.last_seen.lock().map_err(|_| {
            WordApiError::Internal("Failed to acquire lock on rate limit table".to_string())
        })?;

        let window_ms = self.window_ms;
        let expired = |ts: u64| ts > now || now - ts >= window_ms;

        // A timestamp from the future means the clock stepped back; treat it
        // as expired rather than locking the client out.
        let admitted = match last_seen.get(client_id) {
            Some(&last) => expired(last),
            None => true,
        };

        if !admitted {
            tracing::debug!(client_id, "Rate limited");
            return Ok(false);
        }

        last_seen.insert(client_id.to_string(), now);

        // Opportunistic cleanup of everything that has aged out
        let before = last_seen.len();
        last_seen.retain(|_, &mut ts| !expired(ts));
        let purged = before - last_seen.len();
        if purged > 0 {
            tracing::trace!(purged, "Purged expired rate limit entries");
        }

        Ok(true)
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.last_seen.lock().map(|m| m.len()).unwrap_or_default()
    }
}
