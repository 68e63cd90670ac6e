//! Request middleware.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::server::AppState;

/// Static bearer-token check for the mutating endpoint.
///
/// When no token is configured the endpoint is open (the expected deployment
/// puts this service behind a private network). When one is configured, a
/// missing or mismatched `Authorization: Bearer` header gets a 401.
pub async fn bearer_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.auth_token.as_deref() else {
        return next.run(req).await;
    };

    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token == expected);

    match provided {
        Some(true) => next.run(req).await,
        Some(false) => {
            tracing::debug!(path = %req.uri().path(), "bearer token mismatch");
            unauthorized_response("Invalid token")
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "missing Authorization header");
            unauthorized_response("Authentication required")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
