// Memorial site backend
// Entry point and application setup

use anyhow::Context;
use memorial::app;
use memorial::config::AppConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memorial=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting memorial v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = std::env::var_os("MEMORIAL_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let config = AppConfig::load(&data_dir)
        .await
        .context("failed to load configuration")?;

    let (state, notifier) = app::setup(config)
        .await
        .context("application setup failed")?;

    let info = memorial::commands::get_app_info(&state).await?;
    tracing::info!("Ready ({} backend, data in {})", info.backend, info.data_dir);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Shutting down");

    // Dropping the state closes the event queue; let pending mail go out
    drop(state);
    if let Some(task) = notifier {
        if let Err(e) = task.await {
            tracing::error!("Notifier task failed: {}", e);
        }
    }

    Ok(())
}
