//! Inbound claim record

use serde::{Deserialize, Serialize};

use crate::error::ClaimValidationError;

/// Upper bound of the customer history score
pub const MAX_HISTORY_SCORE: f64 = 100.0;

/// One insurance-incident record submitted for risk assessment
///
/// Transient: it lives for a single pipeline run and is only persisted as a
/// snapshot inside the audit payload and the archival store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    /// Caller-supplied claim reference, not unique across time
    pub claim_id: String,
    /// Caller-supplied customer reference
    pub customer_id: String,
    /// Claimed amount, currency-agnostic
    pub amount: f64,
    /// Free-text incident category
    pub incident_type: String,
    /// Customer history score in [0, 100]
    pub history_score: f64,
}

impl ClaimInput {
    pub fn new(
        claim_id: impl Into<String>,
        customer_id: impl Into<String>,
        amount: f64,
        incident_type: impl Into<String>,
        history_score: f64,
    ) -> Self {
        Self {
            claim_id: claim_id.into(),
            customer_id: customer_id.into(),
            amount,
            incident_type: incident_type.into(),
            history_score,
        }
    }

    /// Checks the preconditions the scoring formula relies on
    pub fn validate(&self) -> Result<(), ClaimValidationError> {
        if self.claim_id.trim().is_empty() {
            return Err(ClaimValidationError::EmptyField { field: "claim_id" });
        }
        if self.customer_id.trim().is_empty() {
            return Err(ClaimValidationError::EmptyField { field: "customer_id" });
        }
        if self.incident_type.trim().is_empty() {
            return Err(ClaimValidationError::EmptyField { field: "incident_type" });
        }
        // NaN fails both comparisons, so it is rejected here too
        if !(self.amount > 0.0 && self.amount.is_finite()) {
            return Err(ClaimValidationError::NonPositiveAmount(self.amount));
        }
        if !(0.0..=MAX_HISTORY_SCORE).contains(&self.history_score) {
            return Err(ClaimValidationError::HistoryScoreOutOfRange(self.history_score));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ClaimInput {
        ClaimInput::new("CLM-1", "CUST-1", 1200.0, "collision", 40.0)
    }

    #[test]
    fn test_valid_claim_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_blank_identifiers_rejected() {
        let mut claim = valid();
        claim.customer_id = "  ".to_string();
        assert_eq!(
            claim.validate(),
            Err(ClaimValidationError::EmptyField { field: "customer_id" })
        );
    }

    #[test]
    fn test_amount_must_be_positive() {
        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let mut claim = valid();
            claim.amount = amount;
            assert!(matches!(
                claim.validate(),
                Err(ClaimValidationError::NonPositiveAmount(_))
            ));
        }
    }

    #[test]
    fn test_history_score_bounds_are_inclusive() {
        let mut claim = valid();
        claim.history_score = 0.0;
        assert!(claim.validate().is_ok());
        claim.history_score = 100.0;
        assert!(claim.validate().is_ok());
        claim.history_score = 100.5;
        assert!(claim.validate().is_err());
        claim.history_score = f64::NAN;
        assert!(claim.validate().is_err());
    }
}
