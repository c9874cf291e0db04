//! Repository implementations
//!
//! Repositories own the SQL and map between rows and domain types. Queries
//! are built at runtime with `sqlx::query_as` and `#[derive(sqlx::FromRow)]`
//! rows, so the crate builds without a live database.

pub mod decisions;
pub mod raw_claims;

pub use decisions::{AuditEventRow, DecisionRepository, DecisionRow};
pub use raw_claims::{RawClaimRepository, RawClaimRow};
