use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use hydrolink_config::AppConfig;
use hydrolink_registry::Reconciler;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, locks::ResourceLocks, middleware as app_middleware};

/// Shared handler state: the reconciler, the per-resource locks, and the
/// optional static bearer token.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<Reconciler>,
    pub locks: ResourceLocks,
    pub auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            reconciler: Arc::new(Reconciler::from_config(cfg)?),
            locks: ResourceLocks::new(),
            auth_token: cfg.server.auth_token.as_deref().map(Arc::from),
        })
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/resource/{resource_id}/services",
            post(handlers::reconcile_resource),
        )
        // Auth guards only the mutating endpoint; health stays open.
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::bearer_auth,
        ))
        .route("/healthz", get(handlers::healthz))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .with_state(state)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> anyhow::Result<HydrolinkServer> {
        let state = AppState::from_config(&self.config)?;
        Ok(HydrolinkServer {
            addr: self.addr,
            app: build_app(state),
        })
    }
}

pub struct HydrolinkServer {
    addr: SocketAddr,
    app: Router,
}

impl HydrolinkServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
