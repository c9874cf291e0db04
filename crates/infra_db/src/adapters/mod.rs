//! Port Adapters
//!
//! PostgreSQL implementations of the `domain_scoring` ports. Each adapter
//! wraps a repository and converts rows into domain types.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::PostgresDecisionStore;
//! use domain_scoring::DecisionStore;
//!
//! let store: Arc<dyn DecisionStore> = Arc::new(PostgresDecisionStore::new(pool));
//! let recent = store.list_decisions(Default::default()).await?;
//! ```

pub mod decision_store;
pub mod claim_archive;

pub use decision_store::PostgresDecisionStore;
pub use claim_archive::PostgresClaimArchive;
