//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the decision pipeline using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL, and
//! adapters implement the domain ports on top of them.
//!
//! - `decisions` and `audit_log` hold the append-only decision record. A
//!   decision and its `decision_created` event are committed together.
//! - `raw_claims` holds the best-effort archive copy of inbound claims.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresDecisionStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresDecisionStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{PostgresClaimArchive, PostgresDecisionStore};
