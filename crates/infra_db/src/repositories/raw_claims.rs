//! Raw claim archive repository
//!
//! Append-only copy of inbound claims, kept apart from the decision tables so
//! it can be pointed at a separate database.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain_scoring::ArchivedClaim;

use crate::error::DatabaseError;

#[derive(Debug, Clone)]
pub struct RawClaimRepository {
    pool: PgPool,
}

impl RawClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, claim: &ArchivedClaim) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO raw_claims (claim_id, customer_id, decision_id, payload, received_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&claim.claim_id)
        .bind(&claim.customer_id)
        .bind(Uuid::from(claim.decision_id))
        .bind(&claim.payload)
        .bind(claim.received_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Archived copies of one claim, oldest first
    pub async fn find_by_claim_id(&self, claim_id: &str) -> Result<Vec<RawClaimRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, RawClaimRow>(
            r#"
            SELECT id, claim_id, customer_id, decision_id, payload, received_at
            FROM raw_claims
            WHERE claim_id = $1
            ORDER BY received_at ASC, id ASC
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RawClaimRow {
    pub id: i64,
    pub claim_id: String,
    pub customer_id: String,
    pub decision_id: Uuid,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}
