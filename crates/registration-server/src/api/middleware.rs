//! Admin authentication and logging middleware.

use super::AppState;
use crate::error::ServerError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::ExposeSecret;
use tracing::{debug, error, warn};

/// Check an `Authorization` header against the shared PIN.
///
/// Only the password half of the Basic credentials is compared; the user
/// name is ignored.
pub fn check_basic_auth(header: Option<&HeaderValue>, pin: &str) -> Result<(), ServerError> {
    let value = header.and_then(|v| v.to_str().ok()).unwrap_or_default();

    let mut parts = value.split_whitespace();
    let token = match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("basic") => token,
        _ => return Err(ServerError::AuthenticationRequired),
    };

    let decoded = STANDARD
        .decode(token)
        .map_err(|_| ServerError::Unauthorized)?;
    let credentials = String::from_utf8_lossy(&decoded);

    match credentials.split_once(':') {
        Some((_, password)) if password == pin => Ok(()),
        _ => Err(ServerError::Unauthorized),
    }
}

/// Reject administrator requests without the right PIN.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let result = check_basic_auth(
        request.headers().get(header::AUTHORIZATION),
        state.admin_pin.expose_secret(),
    );

    if let Err(e) = result {
        warn!(uri = %request.uri(), "Admin request rejected: {}", e);
        return Err(e);
    }

    debug!("Admin auth passed");
    Ok(next.run(request).await)
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        error!(%method, %uri, %status, ?duration, "Request failed");
    } else if status.is_client_error() {
        warn!(%method, %uri, %status, ?duration, "Request rejected");
    } else {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    }

    response
}
