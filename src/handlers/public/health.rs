// handlers/public/health.rs - GET /health

use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::handlers::HandlerResult;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> HandlerResult {
    let responder = &state.responder;

    match state.health.ping().await {
        Ok(()) => Ok(responder.data(StatusCode::OK, json!({ "database": "ok" }), &[])),
        Err(e) => {
            let reply = responder.message(StatusCode::SERVICE_UNAVAILABLE, &[]);
            error!(
                correlation_id = reply.correlation_id().unwrap_or_default(),
                "Health check failed: {}", e
            );
            Err(reply)
        }
    }
}
