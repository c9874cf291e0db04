//! PostgreSQL Claim Archive Adapter
//!
//! Implements the `ClaimArchive` port against the `raw_claims` table. The
//! pool is usually a separate one from the decision store's.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError};
use domain_scoring::{ArchivedClaim, ClaimArchive};

use crate::repositories::RawClaimRepository;

#[derive(Debug, Clone)]
pub struct PostgresClaimArchive {
    repository: RawClaimRepository,
    pool: PgPool,
}

impl PostgresClaimArchive {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RawClaimRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &RawClaimRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimArchive {}

#[async_trait]
impl ClaimArchive for PostgresClaimArchive {
    fn is_available(&self) -> bool {
        !self.pool.is_closed()
    }

    #[instrument(skip_all, fields(claim_id = %claim.claim_id, decision_id = %claim.decision_id))]
    async fn store_claim(&self, claim: ArchivedClaim) -> Result<(), PortError> {
        let id = self.repository.insert(&claim).await?;
        debug!(archive_row = id, "Raw claim archived");
        Ok(())
    }
}
