use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // WebSocket surface for the console page
        .route("/client-ws", get(crate::websocket::websocket_handler))
        // Health check
        .route("/api/health", get(health_check))
        // Static console assets
        .fallback_service(ServeDir::new(&system_config.frontend_dir))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let api_base = &state.config.translator_config.api_base;
    let api_reachable = state.backend.health_check(api_base).await.unwrap_or(false);
    Json(json!({
        "status": "ok",
        "default_api_reachable": api_reachable,
        "active_sessions": state.client_contexts.len(),
    }))
}
