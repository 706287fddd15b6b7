use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;

use webhook_telegram_relay::config::Settings;
use webhook_telegram_relay::server::{create_app, AppState};
use webhook_telegram_relay::shutdown::{serve_until, shutdown_signal, ShutdownOutcome};
use webhook_telegram_relay::telegram::TelegramClient;
use webhook_telegram_relay::telemetry::{init_tracing, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing(LogFormat::from_env());

    // Load configuration
    let settings = Settings::new()?;
    tracing::info!(webhooks = settings.webhooks.len(), "Configuration loaded");

    let client = Arc::new(TelegramClient::new(&settings.telegram)?);
    if let Some(url) = settings.telegram.webhook_url.as_deref().filter(|u| !u.is_empty()) {
        client.set_webhook(url).await?;
    }

    let drain_timeout = Duration::from_secs(settings.server.shutdown_timeout);
    let addr = settings.server_addr();

    // Create application state
    let state = AppState::new(settings, client)?;
    let app = create_app(state)?;

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    match serve_until(listener, app, shutdown_signal(), drain_timeout).await? {
        ShutdownOutcome::Drained => tracing::info!("Server shutdown complete"),
        ShutdownOutcome::TimedOut => tracing::warn!("Server shutdown forced after drain timeout"),
    }

    Ok(())
}
