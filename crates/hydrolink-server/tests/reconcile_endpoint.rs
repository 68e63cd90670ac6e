//! Endpoint-level tests for the HTTP surface.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header::AUTHORIZATION};
use hydrolink_config::AppConfig;
use hydrolink_registry::Reconciler;
use hydrolink_server::{AppState, build_app};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state(manifest_url: &str, auth_token: Option<&str>) -> AppState {
    let mut cfg = AppConfig::default();
    cfg.manifest.base_url = manifest_url.to_string();
    AppState {
        reconciler: Arc::new(Reconciler::from_config(&cfg).unwrap()),
        locks: Default::default(),
        auth_token: auth_token.map(Arc::from),
    }
}

fn reconcile_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/resource/r1/services");
    if let Some(t) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn reconcile_answers_201_with_summary_body() {
    let manifest = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hsapi/resource/r1/file_list/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&manifest)
        .await;

    let app = build_app(state(&format!("{}/hsapi", manifest.uri()), None));
    let response = app.oneshot(reconcile_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "resource": {}, "content": [] }));
}

// An unreachable manifest source is the inaccessible-resource path: still 201,
// empty summary.
#[tokio::test]
async fn unreachable_manifest_still_answers_201() {
    let app = build_app(state("http://127.0.0.1:1/hsapi", None));
    let response = app.oneshot(reconcile_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["content"], json!([]));
}

#[tokio::test]
async fn missing_token_is_rejected_when_auth_configured() {
    let app = build_app(state("http://127.0.0.1:1/hsapi", Some("sekrit")));
    let response = app.oneshot(reconcile_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let app = build_app(state("http://127.0.0.1:1/hsapi", Some("sekrit")));
    let response = app.oneshot(reconcile_request(Some("guess"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn correct_token_is_accepted() {
    let app = build_app(state("http://127.0.0.1:1/hsapi", Some("sekrit")));
    let response = app
        .oneshot(reconcile_request(Some("sekrit")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn healthz_is_open_even_with_auth_configured() {
    let app = build_app(state("http://127.0.0.1:1/hsapi", Some("sekrit")));
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_on_reconcile_route_is_rejected() {
    let app = build_app(state("http://127.0.0.1:1/hsapi", None));
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/resource/r1/services")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    // The reconcile route only accepts POST.
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
