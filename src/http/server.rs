//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all token and admin handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Bind caller identity and API key checks to the mutating routes
//! - Serve until the shutdown signal fires

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::NodeConfig;
use crate::http::handlers;
use crate::http::middleware::{api_key_middleware, caller_context_middleware};
use crate::http::request::track_metrics;
use crate::token::Token;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub token: Arc<Token>,
    pub config: Arc<NodeConfig>,
}

impl AppState {
    pub fn new(token: Arc<Token>, config: Arc<NodeConfig>) -> Self {
        Self { token, config }
    }
}

/// HTTP server for the token API.
pub struct HttpServer {
    router: Router,
    config: Arc<NodeConfig>,
}

impl HttpServer {
    /// Create a new HTTP server over a deployed token.
    pub fn new(token: Arc<Token>, config: Arc<NodeConfig>) -> Self {
        let state = AppState::new(token, config.clone());
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let listener = &state.config.listener;
        let timeout = Duration::from_secs(listener.request_timeout_secs);
        let body_limit = listener.max_body_bytes;

        let caller_bound = Router::new()
            .route("/v1/transfer", post(handlers::transfer))
            .route("/v1/approve", post(handlers::approve))
            .route("/v1/transfer-from", post(handlers::transfer_from))
            .route("/v1/backup", post(handlers::set_backup))
            .route_layer(middleware::from_fn(caller_context_middleware));

        let mutating = caller_bound
            .route("/v1/emergency-transfer", post(handlers::emergency_transfer))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                api_key_middleware,
            ));

        let mut app = Router::new()
            .route("/health", get(handlers::health))
            .route("/v1/token", get(handlers::token_info))
            .route("/v1/accounts/{address}", get(handlers::get_account))
            .route(
                "/v1/allowances/{owner}/{spender}",
                get(handlers::get_allowance),
            )
            .merge(mutating);

        if state.config.admin.enabled {
            app = app.merge(setup_admin_router(state.clone()));
        }

        app.route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(TimeoutLayer::new(timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin = self.config.admin.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
