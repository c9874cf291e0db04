//! Pre-built Test Fixtures
//!
//! Claims whose scoring outcome is known in advance.

use domain_scoring::{ClaimInput, DecisionLabel};

/// Reference claims with their expected risk score and decision
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// $400 collision, history 20: risk 26, approved
    pub fn small_collision() -> ClaimInput {
        ClaimInput::new("CLM-2024-0001", "CUST-1001", 400.0, "collision", 20.0)
    }

    /// $50,000 fire, history 80: risk clamps to 100, rejected
    pub fn large_fire() -> ClaimInput {
        ClaimInput::new("CLM-2024-0002", "CUST-1002", 50_000.0, "fire", 80.0)
    }

    /// $6,000 theft, history 10: risk 58, sent for review
    pub fn mid_theft() -> ClaimInput {
        ClaimInput::new("CLM-2024-0003", "CUST-1003", 6_000.0, "Theft", 10.0)
    }

    /// $500 with an unrecognised category: lands in the second amount band
    pub fn band_edge_unknown() -> ClaimInput {
        ClaimInput::new("CLM-2024-0004", "CUST-1004", 500.0, "unknown-category", 0.0)
    }

    /// Every fixture paired with its expected (risk score, decision)
    pub fn all() -> Vec<(ClaimInput, f64, DecisionLabel)> {
        vec![
            (Self::small_collision(), 26.0, DecisionLabel::Approve),
            (Self::large_fire(), 100.0, DecisionLabel::Reject),
            (Self::mid_theft(), 58.0, DecisionLabel::Review),
            (Self::band_edge_unknown(), 25.0, DecisionLabel::Approve),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_scoring::ScoringEngine;

    #[test]
    fn test_fixtures_score_as_documented() {
        for (claim, risk, decision) in ClaimFixtures::all() {
            let outcome = ScoringEngine::score(&claim);
            assert!((outcome.risk_score - risk).abs() < 1e-9, "{}", claim.claim_id);
            assert_eq!(outcome.decision, decision, "{}", claim.claim_id);
        }
    }
}
