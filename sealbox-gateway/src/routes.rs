//! HTTP routes for the encryption gateway.
//!
//! Request parameters arrive as untyped strings and are parsed here, before
//! anything reaches the gateway core: `key_id` into [`KeyId`], the multipart
//! body into filename and bytes. Downloads stream back as
//! `application/octet-stream` with the `.enc` suffix stripped from the
//! attachment filename.

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GatewayError;
use crate::gateway::{original_name, FileGateway};
use sealbox_kms::KeyId;

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// State shared by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: FileGateway,
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("decryption failed (wrong key or tampered envelope)")]
    DecryptionFailed,

    #[error("upstream unavailable: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::KeyNotFound(_) | GatewayError::ObjectNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            GatewayError::DecryptionFailed => ApiError::DecryptionFailed,
            GatewayError::InvalidRequest(_) => ApiError::Validation(e.to_string()),
            GatewayError::KeyServiceUnavailable(_) | GatewayError::KeyService(_) => {
                ApiError::Upstream(e.to_string())
            }
            GatewayError::Storage(_) | GatewayError::Encryption(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::DecryptionFailed => (StatusCode::BAD_REQUEST, "DECRYPTION_FAILED"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// `key_id` query parameter carried by upload and download requests.
#[derive(Deserialize)]
struct KeyIdParam {
    key_id: String,
}

#[derive(Serialize)]
struct UploadResponse {
    message: &'static str,
    filename: String,
}

#[derive(Serialize)]
struct ListFilesResponse {
    files: Vec<String>,
}

/// Builds the gateway router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/encryption/upload", post(upload_file))
        .route("/encryption/download/:filename", get(download_file))
        .route("/encryption/files", get(list_files))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

fn parse_key_id(raw: &str) -> Result<KeyId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("invalid key id: {raw}")))
}

async fn upload_file(
    State(state): State<AppState>,
    Query(params): Query<KeyIdParam>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let key_id = parse_key_id(&params.key_id)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::Validation("file field has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("failed to read file field: {e}")))?;

        let stored = state.gateway.upload(&key_id, &filename, &data).await?;
        return Ok(Json(UploadResponse {
            message: "File encrypted and uploaded successfully",
            filename: stored,
        }));
    }

    Err(ApiError::Validation(
        "missing multipart field 'file'".to_string(),
    ))
}

async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(params): Query<KeyIdParam>,
) -> Result<Response, ApiError> {
    let key_id = parse_key_id(&params.key_id)?;
    let plaintext = state.gateway.download(&key_id, &filename).await?;

    let disposition = format!("attachment; filename=\"{}\"", original_name(&filename));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        plaintext,
    )
        .into_response())
}

async fn list_files(State(state): State<AppState>) -> Result<Json<ListFilesResponse>, ApiError> {
    let files = state.gateway.list().await?;
    Ok(Json(ListFilesResponse { files }))
}
