//! HTTP routes for the key service.
//!
//! Identifiers arrive as untyped path strings and are parsed into
//! [`KeyId`] here, before they reach the keystore. The derived key crosses
//! the wire hex-encoded.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;

use crate::error::KmsError;
use crate::keystore::KeyStore;
use crate::types::KeyId;

/// State shared by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub keystore: KeyStore,
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<KmsError> for ApiError {
    fn from(e: KmsError) -> Self {
        match e {
            KmsError::KeyNotFound(_) => ApiError::NotFound(e.to_string()),
            KmsError::Persistence(_) => ApiError::Internal(e.to_string()),
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
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct GenerateKeyResponse {
    key_id: KeyId,
    message: &'static str,
}

#[derive(Serialize)]
struct RetrieveKeyResponse {
    key_id: KeyId,
    /// 32-byte derived key, lowercase hex.
    key: String,
}

#[derive(Serialize)]
struct DeleteKeyResponse {
    key_id: KeyId,
    message: &'static str,
}

/// Builds the key service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/kms/generate-key", post(generate_key))
        .route("/kms/retrieve-key/:key_id", get(retrieve_key))
        .route("/kms/delete-key/:key_id", delete(delete_key))
        .with_state(state)
}

fn parse_key_id(raw: &str) -> Result<KeyId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("invalid key id: {raw}")))
}

async fn generate_key(
    State(state): State<AppState>,
) -> Result<Json<GenerateKeyResponse>, ApiError> {
    let key_id = state.keystore.generate().await?;
    Ok(Json(GenerateKeyResponse {
        key_id,
        message: "Key generated successfully",
    }))
}

async fn retrieve_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<RetrieveKeyResponse>, ApiError> {
    let key_id = parse_key_id(&key_id)?;
    let key = state.keystore.retrieve(&key_id).await?;
    Ok(Json(RetrieveKeyResponse {
        key: hex::encode(key.as_bytes()),
        key_id,
    }))
}

async fn delete_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<DeleteKeyResponse>, ApiError> {
    let key_id = parse_key_id(&key_id)?;
    state.keystore.delete(&key_id).await?;
    Ok(Json(DeleteKeyResponse {
        key_id,
        message: "Key deleted successfully",
    }))
}
