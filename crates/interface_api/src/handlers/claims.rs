//! Claim scoring handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use crate::dto::claims::{DecisionResponse, ScoreClaimRequest};
use crate::{error::ApiError, AppState};

/// Scores a claim and records the decision
pub async fn score_claim(
    State(state): State<AppState>,
    payload: Result<Json<ScoreClaimRequest>, JsonRejection>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let decision = state.recorder.score_claim(request.into()).await?;
    Ok(Json(decision.into()))
}
