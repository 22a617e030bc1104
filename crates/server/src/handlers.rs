//! HTTP request handlers for API endpoints

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use docx2mdx_core::{ConversionWarning, ConvertConfig, Converter};
use serde::Serialize;
use tracing::{debug, info};

use crate::AppState;
use crate::error::ApiError;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Body of `POST /api/convert`
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub filename: String,
    pub content: String,
    pub warnings: Vec<ConversionWarning>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "ok", version: env!("CARGO_PKG_VERSION") })
}

/// Convert an upload and return it as a file download.
pub async fn convert_download(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let converted = convert_upload(&state, multipart).await?;
    let disposition = content_disposition(&converted.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        converted.content,
    ))
}

/// Convert an upload and return the document as JSON.
pub async fn convert_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
    Ok(Json(convert_upload(&state, multipart).await?))
}

async fn convert_upload(state: &AppState, mut multipart: Multipart) -> Result<ConvertResponse, ApiError> {
    let limit = state.max_upload_bytes;

    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::from_multipart(e, limit))? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = upload_name(field.file_name())?;
        let bytes = field.bytes().await.map_err(|e| ApiError::from_multipart(e, limit))?;
        if bytes.len() > limit {
            return Err(ApiError::TooLarge { limit });
        }
        debug!(file = %file_name, bytes = bytes.len(), "received upload");

        let config = Arc::clone(&state.config);
        return tokio::task::spawn_blocking(move || convert_bytes(&config, &file_name, &bytes))
            .await
            .map_err(|e| ApiError::Internal(format!("Conversion task failed: {}", e)))?;
    }

    Err(ApiError::BadRequest(format!("Missing multipart field '{}'", UPLOAD_FIELD)))
}

/// Write the upload into a scratch directory and convert it there. The
/// directory is removed when this returns.
fn convert_bytes(config: &ConvertConfig, file_name: &str, bytes: &[u8]) -> Result<ConvertResponse, ApiError> {
    let scratch = tempfile::tempdir().map_err(|e| ApiError::Internal(format!("Failed to create temp dir: {}", e)))?;
    let source = scratch.path().join(file_name);
    fs::write(&source, bytes).map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;

    let document = Converter::new(config.clone()).render_document(&source)?;
    let filename = Path::new(file_name)
        .with_extension(&config.target_extension)
        .to_string_lossy()
        .into_owned();

    info!(file = %file_name, warnings = document.warnings.len(), "converted upload");
    Ok(ConvertResponse { filename, content: document.content, warnings: document.warnings })
}

/// `attachment` with an ASCII `filename`. Names that do not survive as-is
/// also get an RFC 5987 `filename*` carrying the UTF-8 original.
fn content_disposition(file_name: &str) -> String {
    let is_plain = |c: char| c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\');
    let ascii: String = file_name.chars().map(|c| if is_plain(c) { c } else { '_' }).collect();
    if ascii == file_name {
        return format!("attachment; filename=\"{}\"", ascii);
    }

    let encoded: String = file_name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect();
    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", ascii, encoded)
}

/// The base name of the uploaded file, which must be a `.docx`.
fn upload_name(file_name: Option<&str>) -> Result<String, ApiError> {
    let name = file_name
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ApiError::BadRequest("Upload has no file name".to_string()))?;

    let is_docx = name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case("docx"));
    if !is_docx {
        return Err(ApiError::BadRequest(format!("Only .docx files are accepted, got '{}'", name)));
    }
    Ok(name)
}
