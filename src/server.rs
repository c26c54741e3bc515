use crate::config::Config;
use crate::handlers::{
    all_words, health_check, home, languages, not_found, random_word, redirect_home, AppState,
    SharedState,
};
use crate::middleware::{ensure_loaded, logging_middleware};
use axum::routing::get;
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the router for a given application state.
pub fn create_app(state: SharedState) -> Router {
    // Data routes make sure the word lists are loaded first
    let data_routes = Router::new()
        .route("/languages", get(languages).fallback(not_found))
        .route("/all", get(all_words).fallback(not_found))
        .route("/word", get(random_word).fallback(not_found))
        .route_layer(middleware::from_fn_with_state(state.clone(), ensure_loaded));

    Router::new()
        .route("/", get(redirect_home).fallback(not_found))
        .route("/home", get(home).fallback(not_found))
        .route("/health", get(health_check).fallback(not_found))
        .merge(data_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(logging_middleware)),
        )
}

pub struct Server {
    app: Router,
    bind_addr: SocketAddr,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let state: SharedState = Arc::new(AppState::from_config(&config));

        Self {
            app: create_app(state),
            bind_addr: config.bind_addr,
        }
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;

        tracing::info!("Random words server listening on {}", self.bind_addr);
        tracing::info!("Landing page available at /home");

        // Run server with graceful shutdown
        axum::serve(
            listener,
            self.app
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}
