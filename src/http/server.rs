//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the demo upstream handler
//! - Wire up middleware (redirect decision, tracing, timeout)
//! - Spawn the cache sweeper when memoization is enabled
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RedirectorConfig;
use crate::http::middleware::{redirect_middleware, RedirectState, SetupError};

/// HTTP server hosting the redirect middleware in front of a demo upstream.
pub struct HttpServer {
    router: Router,
    config: RedirectorConfig,
    state: Arc<RedirectState>,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: RedirectorConfig) -> Result<Self, SetupError> {
        let state = Arc::new(RedirectState::new(&config)?);
        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RedirectorConfig, state: Arc<RedirectState>) -> Router {
        Router::new()
            .route("/{*path}", any(upstream_handler))
            .route("/", any(upstream_handler))
            .layer(middleware::from_fn_with_state(state, redirect_middleware))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.listener.request_timeout_secs),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = self.state.cache().cloned().map(|cache| {
            let interval = Duration::from_secs(self.config.cache.sweep_interval_secs.max(1));
            let mut shutdown = shutdown.resubscribe();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {
                            cache.sweep();
                            tracing::debug!(entries = cache.len(), "Decision cache swept");
                        }
                        _ = shutdown.recv() => break,
                    }
                }
            })
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        if let Some(handle) = sweeper {
            let _ = handle.await;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Demo upstream handler standing in for the next link of a real chain.
/// Echoes the request line and headers so forwarded requests (including the
/// rendered headers) are visible end to end.
async fn upstream_handler(req: Request<Body>) -> impl IntoResponse {
    let mut body = format!("forwarded {} {}\n", req.method(), req.uri().path());
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            body.push_str(&format!("{}: {}\n", name, value));
        }
    }
    body
}
