//! Demo data seeding
//!
//! Only enabled when a seed token is configured. Seeded claims go through
//! the template-only pipeline, so each one gets a decision and an audit
//! event like any scored claim.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, warn};
use validator::Validate;

use domain_scoring::ClaimInput;

use crate::dto::seed::{SeedQuery, SeedResponse};
use crate::middleware::secret_matches;
use crate::{error::ApiError, AppState};

const DEMO_INCIDENTS: [&str; 5] = ["collision", "theft", "fire", "injury", "vandalism"];

/// Generates demo claims and records a decision for each
pub async fn seed_demo_data(
    State(state): State<AppState>,
    query: Result<Query<SeedQuery>, QueryRejection>,
) -> Result<Json<SeedResponse>, ApiError> {
    let Some(expected) = state.config.seed_token() else {
        return Err(ApiError::NotFound("Seeding is disabled".to_string()));
    };

    let Query(query) = query?;
    if !secret_matches(query.seed_token.as_deref(), expected) {
        warn!("Seed request with invalid token");
        return Err(ApiError::Unauthorized("Invalid seed token".to_string()));
    }
    query.validate()?;

    let claims = demo_claims(query.count());
    let mut seeded = 0;
    for claim in claims {
        state.recorder.score_claim_template_only(claim).await?;
        seeded += 1;
    }

    info!(seeded, "Seeded demo claims");
    Ok(Json(SeedResponse::new(seeded)))
}

/// Random claims shaped like real submissions
fn demo_claims(count: u32) -> Vec<ClaimInput> {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let amount: f64 = rng.random_range(500.0..50_000.0);
            let incident = DEMO_INCIDENTS.choose(&mut rng).copied().unwrap_or("collision");
            ClaimInput::new(
                format!("CLM-DEMO-{:04}", i + 1),
                format!("CUST-{}", rng.random_range(1000..=9999)),
                (amount * 100.0).round() / 100.0,
                incident,
                f64::from(rng.random_range(0u8..=100)),
            )
        })
        .collect()
}
