//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims decision service.
//!
//! # Modules
//!
//! - `fixtures`: Reference claims with known scoring outcomes
//! - `builders`: Builder for claim inputs
//! - `database`: PostgreSQL testcontainer with the bundled schema applied
//! - `assertions`: Assertions tying a decision to its audit trail
//! - `generators`: Proptest strategies and `fake`-backed random claims
//! - `pipeline`: Recorder wiring over the in-memory mock ports
//! - `logging`: Per-test tracing subscriber

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;
pub mod pipeline;
pub mod logging;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
pub use pipeline::*;
pub use logging::init_test_tracing;
