//! Admin gate.
//!
//! The admin view is unlocked with a static shared secret. This only hides
//! the admin controls from casual visitors: the secret is known to every
//! client that can unlock the page, so it is not an authentication
//! boundary. Deployments that need real protection must put proper
//! authentication in front of `/api/admin`.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Message shown when the admin key matches.
pub const UNLOCKED_MESSAGE: &str = "Admin controls unlocked.";

/// Message shown when the admin key does not match.
pub const INCORRECT_KEY_MESSAGE: &str = "Incorrect key. Please check with site administrator.";

/// Gate layer for admin routes; the expected key is passed in by the router.
pub async fn admin_gate_layer(expected_key: String, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string())
        });

    match provided {
        Some(key) if key_matches(&key, &expected_key) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Admin request with incorrect key");
            unauthorized_response(INCORRECT_KEY_MESSAGE)
        }
        None => unauthorized_response("Admin key required"),
    }
}

/// Compare a submitted key with the configured one in constant time.
pub fn key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
