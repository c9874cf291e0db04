//! Claim scoring DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::DecisionId;
use domain_scoring::{ClaimInput, Decision, DecisionLabel};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScoreClaimRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub claim_id: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub customer_id: String,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub amount: f64,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub incident_type: String,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub history_score: f64,
}

impl From<ScoreClaimRequest> for ClaimInput {
    fn from(req: ScoreClaimRequest) -> Self {
        ClaimInput::new(
            req.claim_id,
            req.customer_id,
            req.amount,
            req.incident_type,
            req.history_score,
        )
    }
}

/// A recorded decision as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub decision_id: DecisionId,
    pub claim_id: String,
    pub customer_id: String,
    pub risk_score: f64,
    pub fraud_probability: f64,
    pub decision: DecisionLabel,
    pub explanation: String,
    pub model_version: String,
    pub policy_version: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Decision> for DecisionResponse {
    fn from(d: Decision) -> Self {
        Self {
            decision_id: d.decision_id,
            claim_id: d.claim_id,
            customer_id: d.customer_id,
            risk_score: d.risk_score,
            fraud_probability: d.fraud_probability,
            decision: d.decision,
            explanation: d.explanation,
            model_version: d.model_version,
            policy_version: d.policy_version,
            timestamp: d.created_at,
        }
    }
}
