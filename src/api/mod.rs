//! REST API for running allocations.
//!
//! Provides two endpoints:
//! - `GET /status`: liveness probe
//! - `POST /optimize`: run the allocator on a JSON request body

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::config::AdvisorConfig;

pub use types::{ErrorResponse, OptimizeRequest};

/// Immutable application state shared across all request handlers.
///
/// Holds the configuration whose tariffs and limits fill in any field a
/// request leaves out. Read-only, so no locks are needed.
pub struct AppState {
    pub config: AdvisorConfig,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/optimize", post(handlers::post_optimize))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
