//! Model listing handler

use axum::{extract::State, Json};

use crate::dto::models::{ModelInfo, ModelsResponse};
use crate::AppState;

pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: vec![ModelInfo::rule_based(&state.recorder.versions().model_version)],
    })
}
