use anyhow::Result;
use fraudscope::{config::Config, http, model};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.clone())
        .with_ansi(false)
        .init();

    info!("🚀 Starting fraudscope prediction service");

    let model = model::load_model(&config)?;
    info!(
        "📊 Model package ready: {} features, threshold {}",
        model.features.len(),
        model.threshold
    );

    http::start_http_server(Arc::new(config), Arc::new(model)).await?;

    Ok(())
}
