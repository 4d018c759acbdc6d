//! HTTP request handlers.

use super::types::{PingResponse, SuccessResponse};
use super::AppState;
use crate::error::ServerError;
use crate::export::{self, EXPORT_DISPOSITION, XLSX_CONTENT_TYPE};
use crate::record::Registration;
use crate::signature;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{error, info};

/// Liveness probe.
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        ts: Utc::now().timestamp_millis(),
    })
}

/// Accept one registration form.
pub async fn register(
    State(state): State<AppState>,
    Json(mut record): Json<Registration>,
) -> Result<Json<SuccessResponse>, ServerError> {
    record.signature = signature::normalize(&record.signature)?;
    record.stamp_entry_time();

    info!(
        name = %record.name,
        signed = !record.signature.is_empty(),
        "Registration received"
    );
    state.store.append(record).await;

    Ok(Json(SuccessResponse::ok()))
}

/// List every registration, in submission order.
pub async fn list_registrations(State(state): State<AppState>) -> Json<Vec<Registration>> {
    Json(state.store.list().await)
}

/// Drop every registration.
pub async fn clear_registrations(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.store.clear().await;
    Json(SuccessResponse::ok())
}

/// Download all registrations as an xlsx workbook.
pub async fn export_registrations(State(state): State<AppState>) -> Result<Response, ServerError> {
    let records = state.store.list().await;

    let export = tokio::task::spawn_blocking(move || export::export_registrations(&records))
        .await
        .map_err(|e| ServerError::Internal(format!("Export task failed: {}", e)))?
        .map_err(|e| {
            error!("Export failed: {}", e);
            e
        })?;

    info!(
        rows = export.rows,
        images = export.images,
        "Registrations exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, EXPORT_DISPOSITION),
        ],
        export.bytes,
    )
        .into_response())
}

/// Fallback for unknown routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
