//! Persisted decision and audit trail model
//!
//! A [`Decision`] is immutable once recorded: there is no update path and
//! corrections are new decisions. Each decision is written together with one
//! `decision_created` [`AuditEvent`] in the same transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AuditEventId, DecisionId, TraceId};

use crate::claim::ClaimInput;
use crate::explanation::ExplanationSource;
use crate::scoring::{DecisionLabel, ScoreOutcome};

/// Event type written by the pipeline for every new decision
pub const DECISION_CREATED: &str = "decision_created";

/// Default page size for decision listings
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
/// Hard cap on the page size for decision listings
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Version labels stamped onto every decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersions {
    pub model_version: String,
    pub policy_version: String,
}

impl ModelVersions {
    pub fn new(model_version: impl Into<String>, policy_version: impl Into<String>) -> Self {
        Self {
            model_version: model_version.into(),
            policy_version: policy_version.into(),
        }
    }
}

impl Default for ModelVersions {
    fn default() -> Self {
        Self::new("rb-v1", "policy-v1")
    }
}

/// A recorded decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision_id: DecisionId,
    pub claim_id: String,
    pub customer_id: String,
    pub model_version: String,
    pub policy_version: String,
    pub risk_score: f64,
    pub fraud_probability: f64,
    pub decision: DecisionLabel,
    pub explanation: String,
    /// Assigned by the storage layer at persistence time
    pub created_at: DateTime<Utc>,
}

impl Decision {
    pub fn outcome(&self) -> ScoreOutcome {
        ScoreOutcome {
            risk_score: self.risk_score,
            fraud_probability: self.fraud_probability,
            decision: self.decision,
        }
    }
}

/// A decision ready to be written; the store assigns `created_at`
#[derive(Debug, Clone, PartialEq)]
pub struct NewDecision {
    pub decision_id: DecisionId,
    pub claim_id: String,
    pub customer_id: String,
    pub model_version: String,
    pub policy_version: String,
    pub risk_score: f64,
    pub fraud_probability: f64,
    pub decision: DecisionLabel,
    pub explanation: String,
}

impl NewDecision {
    pub fn new(
        claim: &ClaimInput,
        outcome: &ScoreOutcome,
        explanation: String,
        versions: &ModelVersions,
    ) -> Self {
        Self {
            decision_id: DecisionId::new_v7(),
            claim_id: claim.claim_id.clone(),
            customer_id: claim.customer_id.clone(),
            model_version: versions.model_version.clone(),
            policy_version: versions.policy_version.clone(),
            risk_score: outcome.risk_score,
            fraud_probability: outcome.fraud_probability,
            decision: outcome.decision,
            explanation,
        }
    }

    pub fn into_decision(self, created_at: DateTime<Utc>) -> Decision {
        Decision {
            decision_id: self.decision_id,
            claim_id: self.claim_id,
            customer_id: self.customer_id,
            model_version: self.model_version,
            policy_version: self.policy_version,
            risk_score: self.risk_score,
            fraud_probability: self.fraud_probability,
            decision: self.decision,
            explanation: self.explanation,
            created_at,
        }
    }
}

/// Snapshot written when a decision is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionCreatedPayload {
    pub trace_id: TraceId,
    pub input: ClaimInput,
    pub output: ScoreOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_source: Option<ExplanationSource>,
}

/// Structured audit payload, one schema per event type
#[derive(Debug, Clone, PartialEq)]
pub enum AuditPayload {
    DecisionCreated(DecisionCreatedPayload),
    /// An event type this build does not know, kept as stored
    Unrecognized {
        event_type: String,
        payload: serde_json::Value,
    },
}

impl AuditPayload {
    pub fn event_type(&self) -> &str {
        match self {
            AuditPayload::DecisionCreated(_) => DECISION_CREATED,
            AuditPayload::Unrecognized { event_type, .. } => event_type,
        }
    }

    /// Serializes the payload body for storage; the tag lives in its own column
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            AuditPayload::DecisionCreated(payload) => serde_json::to_value(payload),
            AuditPayload::Unrecognized { payload, .. } => Ok(payload.clone()),
        }
    }

    /// Rebuilds a payload from its stored tag and body
    pub fn from_stored(
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        match event_type {
            DECISION_CREATED => Ok(AuditPayload::DecisionCreated(serde_json::from_value(payload)?)),
            other => Ok(AuditPayload::Unrecognized {
                event_type: other.to_string(),
                payload,
            }),
        }
    }
}

/// A recorded audit event
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub id: AuditEventId,
    pub decision_id: DecisionId,
    pub payload: AuditPayload,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn event_type(&self) -> &str {
        self.payload.event_type()
    }
}

/// An audit event ready to be written alongside its decision
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEvent {
    pub id: AuditEventId,
    pub decision_id: DecisionId,
    pub payload: AuditPayload,
}

impl NewAuditEvent {
    pub fn decision_created(decision_id: DecisionId, payload: DecisionCreatedPayload) -> Self {
        Self {
            id: AuditEventId::new_v7(),
            decision_id,
            payload: AuditPayload::DecisionCreated(payload),
        }
    }

    pub fn into_event(self, created_at: DateTime<Utc>) -> AuditEvent {
        AuditEvent {
            id: self.id,
            decision_id: self.decision_id,
            payload: self.payload,
            created_at,
        }
    }
}

/// A decision with its audit trail, oldest event first
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionWithAudit {
    pub decision: Decision,
    pub audit_events: Vec<AuditEvent>,
}

/// Pagination for decision listings, newest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionPage {
    pub limit: u32,
    pub offset: u32,
}

impl DecisionPage {
    /// Builds a page, capping the limit at [`MAX_PAGE_LIMIT`]
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.min(MAX_PAGE_LIMIT),
            offset,
        }
    }
}

impl Default for DecisionPage {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, 0)
    }
}
