use axum::{Json, extract::State};
use promptlab_core::types::GenerationResult;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub results: Vec<GenerationResult>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub reflection: String,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let reflection = state
        .engine
        .analyze(&req.results)
        .await
        .map_err(|e| ApiError::from_engine(e, "Failed to generate reflection"))?;

    Ok(Json(AnalyzeResponse { reflection }))
}
