//! Route handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::server::AppState;

/// `POST /resource/{resource_id}/services` — reconcile one resource.
///
/// Runs behind the per-resource lock so overlapping requests for the same
/// resource execute one at a time. The reconciler resolves every failure into
/// the summary body, so the status is always 201: the response reports what
/// was attempted, not whether everything succeeded.
pub async fn reconcile_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
) -> impl IntoResponse {
    let _guard = state.locks.acquire(&resource_id).await;
    let summary = state.reconciler.reconcile(&resource_id).await;
    (StatusCode::CREATED, Json(summary))
}

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
