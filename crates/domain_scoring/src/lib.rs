//! Claim Risk Decisioning Domain
//!
//! This crate implements the decision pipeline: a claim is scored by a
//! fixed deterministic formula, explained (remote generator first, template
//! as the guaranteed floor), and recorded together with its audit event in a
//! single atomic write.
//!
//! # Pipeline
//!
//! ```text
//! ClaimInput -> ScoringEngine -> ExplanationStrategy -> DecisionStore (Decision + AuditEvent)
//!                                                            |
//!                                                            +-> ClaimArchive (best effort)
//! ```

pub mod claim;
pub mod scoring;
pub mod decision;
pub mod explanation;
pub mod ports;
pub mod recorder;
pub mod error;

pub use claim::ClaimInput;
pub use scoring::{ScoringEngine, ScoreOutcome, DecisionLabel, RiskLevel};
pub use decision::{
    Decision, NewDecision, AuditEvent, NewAuditEvent, AuditPayload, DecisionCreatedPayload,
    DecisionPage, DecisionWithAudit, ModelVersions,
};
pub use explanation::{Explanation, ExplanationSource, ExplanationStrategy};
pub use ports::{DecisionStore, TextGenerator, ClaimArchive, ArchivedClaim};
pub use recorder::DecisionRecorder;
pub use error::{ClaimValidationError, ScoringError};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockDecisionStore, MockTextGenerator, MockClaimArchive, GeneratorBehavior};
