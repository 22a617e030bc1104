//! Upload server binary

use clap::Parser;
use docx2mdx_server::{AppState, ServerConfig, start_server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docx2mdx_server=info,docx2mdx_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();
    tracing::info!(max_upload_bytes = config.max_upload_bytes, "loaded configuration");

    start_server(&config.addr, AppState::from(&config)).await?;
    Ok(())
}
