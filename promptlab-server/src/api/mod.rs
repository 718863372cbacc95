pub mod analyze;
pub mod generate;

use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate::generate))
        .route("/api/analyze", post(analyze::analyze))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        // The browser client is served from a different origin, so the
        // relay answers CORS wide open, as the original did.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    llm_base_url: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        llm_base_url: state.engine.base_url().to_string(),
    })
}
