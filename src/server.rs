//! HTTP transport for MCP and health checks

use crate::error::{ProtocolError, Result};
use crate::protocol::MessageHandler;
use crate::shutdown::ShutdownNotifier;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

/// Server state
#[derive(Clone)]
pub struct ServerState {
    pub handler: Arc<dyn MessageHandler>,
}

/// Create HTTP server router
pub fn create_router(state: ServerState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/mcp", post(mcp_endpoint))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}

/// One JSON-RPC message per request body
async fn mcp_endpoint(State(state): State<ServerState>, body: Bytes) -> Response {
    match state.handler.handle_frame(&body).await {
        Some(response) => Json(response).into_response(),
        // Notifications are acknowledged without a body
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Start HTTP server
pub async fn start_server(
    addr: &str,
    state: ServerState,
    max_body_bytes: usize,
    shutdown: ShutdownNotifier,
) -> Result<()> {
    let app = create_router(state, max_body_bytes);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(ProtocolError::Transport)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
        .map_err(ProtocolError::Transport)?;

    info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::McpHandler;
    use crate::tools::ToolRegistry;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        let state = ServerState {
            handler: Arc::new(McpHandler::new(ToolRegistry::new())),
        };
        create_router(state, 1024)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_mcp_endpoint_answers_ping() {
        let response = router()
            .oneshot(
                Request::post("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert!(body["result"].is_object());
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let response = router()
            .oneshot(
                Request::post("/mcp")
                    .body(Body::from(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let body = format!(
            r#"{{"jsonrpc":"2.0","id":1,"method":"ping","params":{{"pad":"{}"}}}}"#,
            "x".repeat(4096)
        );
        let response = router()
            .oneshot(Request::post("/mcp").body(Body::from(body)).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
