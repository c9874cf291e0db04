//! Decision read handlers

use std::str::FromStr;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use validator::Validate;

use core_kernel::DecisionId;

use crate::dto::claims::DecisionResponse;
use crate::dto::decisions::{DecisionDetailResponse, ListDecisionsQuery};
use crate::{error::ApiError, AppState};

/// Lists decisions, newest first
pub async fn list_decisions(
    State(state): State<AppState>,
    query: Result<Query<ListDecisionsQuery>, QueryRejection>,
) -> Result<Json<Vec<DecisionResponse>>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let decisions = state.recorder.list_decisions(query.page()).await?;
    Ok(Json(decisions.into_iter().map(DecisionResponse::from).collect()))
}

/// Gets a decision with its audit trail
pub async fn get_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DecisionDetailResponse>, ApiError> {
    // An id that cannot exist is reported the same way as a missing one
    let id = DecisionId::from_str(&id)
        .map_err(|_| ApiError::NotFound("Decision not found".to_string()))?;

    let detail = state
        .recorder
        .get_decision(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Decision not found".to_string()))?;

    DecisionDetailResponse::try_from(detail)
        .map(Json)
        .map_err(|e| ApiError::Internal(format!("Unreadable audit payload: {}", e)))
}
