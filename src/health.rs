use serde::Serialize;
use std::time::SystemTime;

use crate::handlers::AppState;
use crate::loader::LoadState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub load_state: LoadState,
    pub languages: usize,
    pub tracked_clients: usize,
}

impl HealthStatus {
    /// Snapshot the service state without triggering a load.
    pub fn collect(state: &AppState) -> Self {
        let load_state = state.loader.state();

        // Still serving the fallback list until the first load finishes
        let status = match load_state {
            LoadState::Loaded => "healthy",
            LoadState::Unloaded | LoadState::Loading => "starting",
        };

        HealthStatus {
            status: status.to_string(),
            timestamp: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            load_state,
            languages: state.store.languages().len(),
            tracked_clients: state.rate_limiter.tracked_clients(),
        }
    }
}
