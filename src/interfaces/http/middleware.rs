//! Admin authentication middleware (§1.2, §6): every `/api/*` route except
//! the ambient health/metrics endpoints requires `Authorization: Bearer
//! <key>` matching the configured admin key's SHA-256 hash.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::infrastructure::crypto::api_key::verify_api_key;
use crate::interfaces::http::common::ApiResponse;

#[derive(Clone)]
pub struct AuthState {
    pub admin_key_hash: String,
}

fn extract_bearer(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

pub async fn admin_auth_middleware(
    State(auth): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer);

    match presented {
        Some(key) if verify_api_key(key, &auth.admin_key_hash) => next.run(request).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error("missing or invalid admin API key")),
        )
            .into_response(),
    }
}
