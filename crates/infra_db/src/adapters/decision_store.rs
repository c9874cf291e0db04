//! PostgreSQL Decision Store Adapter
//!
//! Implements the `DecisionStore` port on top of [`DecisionRepository`].
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` through the
//! `From<DatabaseError>` conversion in [`crate::error`].

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DecisionId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_scoring::{
    AuditEvent, Decision, DecisionPage, DecisionStore, DecisionWithAudit, NewAuditEvent,
    NewDecision,
};

use crate::repositories::DecisionRepository;

const ADAPTER_ID: &str = "postgres-decision-store";

/// PostgreSQL-backed implementation of the DecisionStore port
#[derive(Debug, Clone)]
pub struct PostgresDecisionStore {
    repository: DecisionRepository,
    pool: PgPool,
}

impl PostgresDecisionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DecisionRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresDecisionStore {}

#[async_trait]
impl HealthCheckable for PostgresDecisionStore {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult::new(ADAPTER_ID, status, start, message)
    }
}

#[async_trait]
impl DecisionStore for PostgresDecisionStore {
    #[instrument(skip_all, fields(decision_id = %decision.decision_id, claim_id = %decision.claim_id))]
    async fn record_decision(
        &self,
        decision: NewDecision,
        audit: NewAuditEvent,
    ) -> Result<Decision, PortError> {
        if audit.decision_id != decision.decision_id {
            return Err(PortError::validation_field(
                "audit event references another decision",
                "decision_id",
            ));
        }

        let row = self.repository.insert_with_audit(&decision, &audit).await?;
        debug!("Decision and audit event committed");
        Ok(Decision::try_from(row)?)
    }

    #[instrument(skip(self))]
    async fn list_decisions(&self, page: DecisionPage) -> Result<Vec<Decision>, PortError> {
        let rows = self
            .repository
            .list(i64::from(page.limit), i64::from(page.offset))
            .await?;

        rows.into_iter()
            .map(|row| Decision::try_from(row).map_err(PortError::from))
            .collect()
    }

    #[instrument(skip(self), fields(decision_id = %id))]
    async fn get_decision(&self, id: DecisionId) -> Result<Option<DecisionWithAudit>, PortError> {
        let Some(row) = self.repository.get_by_id(id.into()).await? else {
            return Ok(None);
        };
        let decision = Decision::try_from(row)?;

        let audit_events = self
            .repository
            .audit_events_for(id.into())
            .await?
            .into_iter()
            .map(|row| AuditEvent::try_from(row).map_err(PortError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(DecisionWithAudit {
            decision,
            audit_events,
        }))
    }
}
