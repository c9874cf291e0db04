//! Test Data Builders
//!
//! Builders let tests set only the fields they care about.

use domain_scoring::ClaimInput;

use crate::fixtures::ClaimFixtures;

/// Builder for claim inputs, starting from the small collision fixture
#[derive(Debug, Clone)]
pub struct ClaimInputBuilder {
    claim: ClaimInput,
}

impl Default for ClaimInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimInputBuilder {
    pub fn new() -> Self {
        Self {
            claim: ClaimFixtures::small_collision(),
        }
    }

    pub fn with_claim_id(mut self, claim_id: impl Into<String>) -> Self {
        self.claim.claim_id = claim_id.into();
        self
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.claim.customer_id = customer_id.into();
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.claim.amount = amount;
        self
    }

    pub fn with_incident_type(mut self, incident_type: impl Into<String>) -> Self {
        self.claim.incident_type = incident_type.into();
        self
    }

    pub fn with_history_score(mut self, history_score: f64) -> Self {
        self.claim.history_score = history_score;
        self
    }

    pub fn build(self) -> ClaimInput {
        self.claim
    }

    /// Builds the claim as the JSON body the score endpoint accepts
    pub fn build_json(self) -> serde_json::Value {
        serde_json::json!({
            "claim_id": self.claim.claim_id,
            "customer_id": self.claim.customer_id,
            "amount": self.claim.amount,
            "incident_type": self.claim.incident_type,
            "history_score": self.claim.history_score,
        })
    }
}
