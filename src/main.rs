use anyhow::Result;
use clap::Parser;
use random_words::config::Config;
use random_words::server::Server;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Random word HTTP service. Flags override the matching environment variables.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to listen on (BIND_ADDR)
    #[arg(long)]
    bind_addr: Option<SocketAddr>,

    /// Log level for the service (LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(bind_addr) = cli.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("random_words={},tower_http=debug", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting random words service");
    tracing::info!(
        "Configuration: bind_addr={}, primary_url={}, rate_limit_window_ms={}",
        config.bind_addr,
        config.primary_url,
        config.rate_limit_window_ms
    );

    Server::new(config)
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
