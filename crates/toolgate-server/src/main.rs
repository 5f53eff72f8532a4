use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolgate_mcp::Uptime;
use toolgate_server::app_state::AppState;
use toolgate_server::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let uptime = Uptime::start();

    // A missing .env is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    let settings = Settings::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.default_log_level())),
        )
        .init();

    tracing::debug!(?settings, "loaded settings");

    let state = AppState::from_settings(&settings, uptime).context("Invalid settings")?;
    if state.api_keys.is_empty() {
        tracing::warn!("No client keys configured; every /mcp request will be rejected");
    }
    tracing::info!(
        tools = state.dispatcher.registry().len(),
        "Tool registry ready"
    );

    let app = toolgate_server::router::create_router(state);

    let addr = settings.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("toolgate listening on {addr}");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
