use anyhow::Context;
use chat_client::backend::HttpBackend;
use chat_client::config::{AppConfig, DEFAULT_LOG_FILTER};
use chat_client::store::FileStore;
use chat_client::terminal;
use chat_client_core::ChatClient;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing; also picks up `log` records from the core crate
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let config = AppConfig::from_env();
    info!(
        "Chat backend at {}, session state in {}",
        config.client.api_base(),
        config.state_file.display()
    );

    let backend = HttpBackend::new(config.client.clone()).context("Failed to build HTTP client")?;
    let client = ChatClient::new(backend, FileStore::new(&config.state_file));

    // ── Interactive loop ──────────────────────────────────────────────────────
    terminal::run(&client, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    Ok(())
}
