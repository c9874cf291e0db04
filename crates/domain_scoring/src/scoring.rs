//! Deterministic risk scoring
//!
//! The scoring model is a fixed additive heuristic, not a learned model:
//! an amount band, an incident category weight, and a share of the customer
//! history score are summed, clamped to [0, 100], and mapped through a
//! logistic curve to a fraud probability. The decision label is a pure
//! function of that probability.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::claim::ClaimInput;

/// Probability below which a claim is approved
pub const APPROVE_BELOW: f64 = 0.35;
/// Probability below which a claim goes to review; at or above, rejected
pub const REVIEW_BELOW: f64 = 0.70;

/// Weight of the customer history score
pub const HISTORY_WEIGHT: f64 = 0.3;
/// Risk score at which the fraud probability is exactly 0.5
pub const LOGISTIC_MIDPOINT: f64 = 50.0;
/// Slope parameter of the logistic curve
pub const LOGISTIC_SCALE: f64 = 10.0;

pub const MIN_RISK_SCORE: f64 = 0.0;
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Amount bands as (exclusive upper bound, contribution); the last band is open
const AMOUNT_BANDS: [(f64, f64); 3] = [(500.0, 5.0), (5_000.0, 15.0), (20_000.0, 30.0)];
const TOP_AMOUNT_BAND: f64 = 45.0;

/// Incident keywords in priority order; the first contained keyword wins
const INCIDENT_WEIGHTS: [(&str, f64); 4] = [
    ("collision", 15.0),
    ("theft", 25.0),
    ("fire", 35.0),
    ("injury", 20.0),
];
const UNMATCHED_INCIDENT: f64 = 10.0;

/// Outcome label attached to every decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionLabel {
    Approve,
    Review,
    Reject,
}

impl DecisionLabel {
    /// Thresholds are inclusive-lower: 0.35 is REVIEW, 0.70 is REJECT
    pub fn from_probability(fraud_probability: f64) -> Self {
        if fraud_probability < APPROVE_BELOW {
            DecisionLabel::Approve
        } else if fraud_probability < REVIEW_BELOW {
            DecisionLabel::Review
        } else {
            DecisionLabel::Reject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionLabel::Approve => "APPROVE",
            DecisionLabel::Review => "REVIEW",
            DecisionLabel::Reject => "REJECT",
        }
    }
}

impl fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVE" => Ok(DecisionLabel::Approve),
            "REVIEW" => Ok(DecisionLabel::Review),
            "REJECT" => Ok(DecisionLabel::Reject),
            other => Err(format!("unknown decision label '{}'", other)),
        }
    }
}

/// Three-level risk label used in explanations
///
/// Shares the decision thresholds but is derived from the probability on its
/// own, never from the decision label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(fraud_probability: f64) -> Self {
        if fraud_probability < APPROVE_BELOW {
            RiskLevel::Low
        } else if fraud_probability < REVIEW_BELOW {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three values produced by scoring a claim
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub risk_score: f64,
    pub fraud_probability: f64,
    pub decision: DecisionLabel,
}

impl ScoreOutcome {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_probability(self.fraud_probability)
    }
}

/// Stateless scoring engine
pub struct ScoringEngine;

impl ScoringEngine {
    /// Scores a claim
    ///
    /// Total and side-effect free; identical inputs always give identical
    /// outputs. Field validation is the caller's job, but out-of-range inputs
    /// still produce a clamped score rather than NaN or a negative value.
    pub fn score(claim: &ClaimInput) -> ScoreOutcome {
        let raw = Self::amount_contribution(claim.amount)
            + Self::incident_contribution(&claim.incident_type)
            + claim.history_score * HISTORY_WEIGHT;

        let risk_score = clamp_risk(raw);
        let fraud_probability = Self::fraud_probability(risk_score);

        ScoreOutcome {
            risk_score,
            fraud_probability,
            decision: DecisionLabel::from_probability(fraud_probability),
        }
    }

    /// Contribution of the claimed amount; bands are left-inclusive
    pub fn amount_contribution(amount: f64) -> f64 {
        AMOUNT_BANDS
            .iter()
            .find(|(upper, _)| amount < *upper)
            .map(|(_, points)| *points)
            .unwrap_or(TOP_AMOUNT_BAND)
    }

    /// Contribution of the incident category, matched case-insensitively
    pub fn incident_contribution(incident_type: &str) -> f64 {
        let incident = incident_type.to_lowercase();
        INCIDENT_WEIGHTS
            .iter()
            .find(|(keyword, _)| incident.contains(keyword))
            .map(|(_, points)| *points)
            .unwrap_or(UNMATCHED_INCIDENT)
    }

    /// Logistic transform centred at 50 with slope 10
    pub fn fraud_probability(risk_score: f64) -> f64 {
        1.0 / (1.0 + (-(risk_score - LOGISTIC_MIDPOINT) / LOGISTIC_SCALE).exp())
    }
}

fn clamp_risk(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_RISK_SCORE;
    }
    raw.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_band_boundaries() {
        assert_eq!(ScoringEngine::amount_contribution(499.99), 5.0);
        assert_eq!(ScoringEngine::amount_contribution(500.0), 15.0);
        assert_eq!(ScoringEngine::amount_contribution(4_999.99), 15.0);
        assert_eq!(ScoringEngine::amount_contribution(5_000.0), 30.0);
        assert_eq!(ScoringEngine::amount_contribution(20_000.0), 45.0);
        assert_eq!(ScoringEngine::amount_contribution(1e12), 45.0);
    }

    #[test]
    fn test_incident_priority_order() {
        assert_eq!(ScoringEngine::incident_contribution("Rear-end COLLISION"), 15.0);
        // collision is checked before fire
        assert_eq!(ScoringEngine::incident_contribution("collision fire"), 15.0);
        assert_eq!(ScoringEngine::incident_contribution("vehicle theft"), 25.0);
        assert_eq!(ScoringEngine::incident_contribution("theft and fire"), 25.0);
        assert_eq!(ScoringEngine::incident_contribution("Kitchen Fire"), 35.0);
        assert_eq!(ScoringEngine::incident_contribution("personal injury"), 20.0);
        assert_eq!(ScoringEngine::incident_contribution("vandalism"), 10.0);
    }

    #[test]
    fn test_nan_sum_clamps_to_zero() {
        let claim = ClaimInput::new("C", "U", 100.0, "other", f64::NAN);
        let outcome = ScoringEngine::score(&claim);
        assert_eq!(outcome.risk_score, 0.0);
        assert!(outcome.fraud_probability > 0.0);
    }

    #[test]
    fn test_negative_inputs_clamp_at_zero() {
        let claim = ClaimInput::new("C", "U", 100.0, "other", -1_000.0);
        assert_eq!(ScoringEngine::score(&claim).risk_score, 0.0);
    }

    #[test]
    fn test_decision_label_parsing() {
        assert_eq!("REVIEW".parse::<DecisionLabel>(), Ok(DecisionLabel::Review));
        assert!("review".parse::<DecisionLabel>().is_err());
        assert_eq!(
            serde_json::to_string(&DecisionLabel::Approve).unwrap(),
            "\"APPROVE\""
        );
    }
}
