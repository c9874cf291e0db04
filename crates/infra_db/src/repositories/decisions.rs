//! Decision repository implementation
//!
//! Database access for decisions and their audit log. A decision row and its
//! `decision_created` audit row are only ever written together inside one
//! transaction; nothing in this repository updates or deletes either table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{AuditEventId, DecisionId};
use domain_scoring::{AuditEvent, AuditPayload, Decision, DecisionLabel, NewAuditEvent, NewDecision};

use crate::error::DatabaseError;

const DECISION_COLUMNS: &str = r#"
    decision_id, claim_id, customer_id, model_version, policy_version,
    risk_score, fraud_probability, decision, explanation, created_at
"#;

/// Repository for decisions and the audit log
#[derive(Debug, Clone)]
pub struct DecisionRepository {
    pool: PgPool,
}

impl DecisionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the decision, then its audit event, in one transaction
    ///
    /// `created_at` comes from the database clock. If either insert fails
    /// the transaction is dropped unfinished and rolls back.
    pub async fn insert_with_audit(
        &self,
        decision: &NewDecision,
        audit: &NewAuditEvent,
    ) -> Result<DecisionRow, DatabaseError> {
        let payload = audit
            .payload
            .to_json()
            .map_err(DatabaseError::serialization)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::transaction)?;

        let row = sqlx::query_as::<_, DecisionRow>(&format!(
            r#"
            INSERT INTO decisions (
                decision_id, claim_id, customer_id, model_version, policy_version,
                risk_score, fraud_probability, decision, explanation
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            DECISION_COLUMNS
        ))
        .bind(Uuid::from(decision.decision_id))
        .bind(&decision.claim_id)
        .bind(&decision.customer_id)
        .bind(&decision.model_version)
        .bind(&decision.policy_version)
        .bind(decision.risk_score)
        .bind(decision.fraud_probability)
        .bind(decision.decision.as_str())
        .bind(&decision.explanation)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO audit_log (id, decision_id, event_type, event_payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::from(audit.id))
        .bind(Uuid::from(audit.decision_id))
        .bind(audit.payload.event_type())
        .bind(&payload)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(DatabaseError::transaction)?;
        Ok(row)
    }

    /// Lists decisions, newest first; ties on `created_at` break on id
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<DecisionRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, DecisionRow>(&format!(
            r#"
            SELECT {}
            FROM decisions
            ORDER BY created_at DESC, decision_id DESC
            LIMIT $1 OFFSET $2
            "#,
            DECISION_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_by_id(&self, decision_id: Uuid) -> Result<Option<DecisionRow>, DatabaseError> {
        let row = sqlx::query_as::<_, DecisionRow>(&format!(
            "SELECT {} FROM decisions WHERE decision_id = $1",
            DECISION_COLUMNS
        ))
        .bind(decision_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Audit events for a decision, oldest first
    pub async fn audit_events_for(&self, decision_id: Uuid) -> Result<Vec<AuditEventRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, AuditEventRow>(
            r#"
            SELECT id, decision_id, event_type, event_payload, created_at
            FROM audit_log
            WHERE decision_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(decision_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Database row for a decision
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DecisionRow {
    pub decision_id: Uuid,
    pub claim_id: String,
    pub customer_id: String,
    pub model_version: String,
    pub policy_version: String,
    pub risk_score: f64,
    pub fraud_probability: f64,
    pub decision: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DecisionRow> for Decision {
    type Error = DatabaseError;

    fn try_from(row: DecisionRow) -> Result<Self, Self::Error> {
        let decision = row
            .decision
            .parse::<DecisionLabel>()
            .map_err(DatabaseError::serialization)?;

        Ok(Decision {
            decision_id: DecisionId::from_uuid(row.decision_id),
            claim_id: row.claim_id,
            customer_id: row.customer_id,
            model_version: row.model_version,
            policy_version: row.policy_version,
            risk_score: row.risk_score,
            fraud_probability: row.fraud_probability,
            decision,
            explanation: row.explanation,
            created_at: row.created_at,
        })
    }
}

/// Database row for an audit log entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditEventRow {
    pub id: Uuid,
    pub decision_id: Uuid,
    pub event_type: String,
    pub event_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = DatabaseError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let payload = AuditPayload::from_stored(&row.event_type, row.event_payload)
            .map_err(DatabaseError::serialization)?;

        Ok(AuditEvent {
            id: AuditEventId::from_uuid(row.id),
            decision_id: DecisionId::from_uuid(row.decision_id),
            payload,
            created_at: row.created_at,
        })
    }
}
