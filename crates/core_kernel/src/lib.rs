//! Core Kernel - Foundational types for the claims decision service
//!
//! This crate provides the building blocks shared by every other crate:
//! - Strongly-typed identifiers for persisted entities
//! - Port infrastructure for the hexagonal architecture
//! - The per-request trace context

pub mod identifiers;
pub mod error;
pub mod ports;
pub mod trace;

pub use identifiers::{DecisionId, AuditEventId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use trace::TraceId;
