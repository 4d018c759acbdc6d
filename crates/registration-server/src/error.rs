//! Error types for the registration server.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Challenge sent with every 401 so browsers prompt for credentials.
pub const BASIC_CHALLENGE: &str = r#"Basic realm="Admin""#;

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Page not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::AuthenticationRequired => (StatusCode::UNAUTHORIZED, "AUTH_REQUIRED"),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ServerError::InvalidSignature(_) => (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE"),
            ServerError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ServerError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }
        response
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::Storage(format!("JSON serialization error: {}", e))
    }
}

impl From<rust_xlsxwriter::XlsxError> for ServerError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ServerError::Export(e.to_string())
    }
}
