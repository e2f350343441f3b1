use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::model::{Envelope, HealthStatus, McpRequest};
use crate::server::HealthMcpServer;

pub const MCP_PATH: &str = "/aws-health-mcp";
pub const HEALTH_PATH: &str = "/health";

pub fn build_router(server: HealthMcpServer) -> Router {
    Router::new()
        .route(MCP_PATH, post(process_mcp_request))
        .route(HEALTH_PATH, get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(server))
}

/// Always 200 once the body parses; failures travel inside the envelope.
/// The body is read as JSON whatever its `Content-Type`.
async fn process_mcp_request(
    State(server): State<Arc<HealthMcpServer>>,
    body: Bytes,
) -> Result<Json<Envelope>, (StatusCode, String)> {
    let request: McpRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected request body: {}", e);
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    Ok(Json(server.handle_request(request).await))
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}

pub async fn serve(config: &ServerConfig, server: HealthMcpServer) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, build_router(server))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
