use axum::{Json, extract::State};
use promptlab_core::params::RawPromptConfig;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,
    #[serde(rename = "userPrompt")]
    pub user_prompt: String,
    #[serde(flatten)]
    pub config: RawPromptConfig,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub output: String,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let config = req
        .config
        .parse()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let completion = state
        .engine
        .generate(&req.system_prompt, &req.user_prompt, &config)
        .await
        .map_err(|e| ApiError::from_engine(e, "Failed to generate completion"))?;

    Ok(Json(GenerateResponse {
        output: completion.text,
    }))
}
