pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod loader;
pub mod middleware;
pub mod rate_limiter;
pub mod selector;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{Result, WordApiError};
pub use handlers::{AppState, SharedState};
pub use server::create_app;
