//! Server Implementation
//!
//! Router assembly and HTTP server lifecycle.

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    api::build_router()
        // CORS - handle cross-origin requests from the storefront frontend
        .layer(CorsLayer::permissive())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate a unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - injects CurrentUser before routes run
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}

/// HTTP Server
pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn with_state(state: ServerState) -> Self {
        Self { state }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let app = build_app(self.state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        tracing::info!("Customkeeps server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}
