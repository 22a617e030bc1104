//! Upload server for docx2mdx
//!
//! - `GET /health`: liveness and version
//! - `POST /convert`: multipart upload (field `file`), returns the `.mdx` as a download
//! - `POST /api/convert`: same upload, returns `{filename, content, warnings}`

pub mod config;
pub mod error;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use docx2mdx_core::ConvertConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use handlers::{ConvertResponse, HealthResponse, convert_download, convert_json, health_check};

/// Room for multipart headers and boundaries on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Conversion settings; each request builds its own converter from them
    pub config: Arc<ConvertConfig>,
    /// Largest accepted file, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: ConvertConfig, max_upload_bytes: usize) -> Self {
        Self { config: Arc::new(config), max_upload_bytes }
    }
}

impl From<&ServerConfig> for AppState {
    fn from(config: &ServerConfig) -> Self {
        Self::new(config.convert_config(), config.max_upload_bytes)
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/health", get(health_check))
        .route("/convert", post(convert_download))
        .route("/api/convert", post(convert_json))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server and run until Ctrl-C.
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!("Starting docx2mdx server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down");
            }
        })
        .await
}
