//! Explanation generation with a fallback chain
//!
//! The remote text generator is tried first under a hard timeout. Any
//! failure, including the generator not being configured, falls through to
//! the deterministic template, which always succeeds. Callers therefore
//! always receive a non-empty explanation.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{PortError, TraceId};

use crate::claim::ClaimInput;
use crate::ports::TextGenerator;
use crate::scoring::{DecisionLabel, ScoreOutcome};

/// Default bound on a remote generation call
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Which source produced an explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Remote,
    Template,
}

/// A non-empty explanation and its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub text: String,
    pub source: ExplanationSource,
}

/// Remote-first explanation strategy with a template floor
#[derive(Clone)]
pub struct ExplanationStrategy {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl ExplanationStrategy {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// A strategy that never calls out
    pub fn template_only() -> Self {
        Self::new(None, DEFAULT_GENERATOR_TIMEOUT)
    }

    pub async fn explain(&self, claim: &ClaimInput, outcome: &ScoreOutcome) -> Explanation {
        match self.remote(claim, outcome).await {
            Ok(text) => Explanation {
                text,
                source: ExplanationSource::Remote,
            },
            Err(reason) => {
                let trace_id = TraceId::current_or_generate();
                match reason {
                    PortError::ServiceUnavailable { .. } => {
                        debug!(%trace_id, "Text generator not configured, using template")
                    }
                    other => {
                        warn!(%trace_id, error = %other, "Remote explanation failed, using template")
                    }
                }
                Explanation {
                    text: template_explanation(claim, outcome),
                    source: ExplanationSource::Template,
                }
            }
        }
    }

    async fn remote(&self, claim: &ClaimInput, outcome: &ScoreOutcome) -> Result<String, PortError> {
        let generator = self
            .generator
            .as_ref()
            .filter(|generator| generator.is_available())
            .ok_or_else(|| PortError::unavailable("text generator"))?;

        let prompt = build_prompt(claim, outcome);
        let text = tokio::time::timeout(self.timeout, generator.generate(&prompt))
            .await
            .map_err(|_| PortError::timeout("generate explanation", self.timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(PortError::transformation("generator returned empty text"));
        }
        Ok(text.to_string())
    }
}

/// Renders the generation prompt for a scored claim
pub fn build_prompt(claim: &ClaimInput, outcome: &ScoreOutcome) -> String {
    format!(
        "Explain why this insurance claim is considered {level} risk based on these factors:\n\
         - Amount: {amount}\n\
         - Incident type: {incident}\n\
         - Customer history score: {history:.1}/100\n\
         - Risk score: {risk:.2}/100\n\
         - Fraud probability: {probability}\n\
         \n\
         Provide 3 bullet reasons and 1 recommended next action. Keep it business-friendly \
         and compliance-aware. Use professional insurance terminology.",
        level = outcome.risk_level(),
        amount = format_currency(claim.amount),
        incident = claim.incident_type,
        history = claim.history_score,
        risk = outcome.risk_score,
        probability = format_percent(outcome.fraud_probability),
    )
}

/// Deterministic explanation; the recommended action follows the decision label
pub fn template_explanation(claim: &ClaimInput, outcome: &ScoreOutcome) -> String {
    let (first_action, second_action) = match outcome.decision {
        DecisionLabel::Approve => (
            "Auto-approve this claim for fast-track processing",
            "Estimated processing time: <2 hours",
        ),
        DecisionLabel::Review => (
            "Assign to senior adjuster for manual review",
            "Request additional documentation if needed",
        ),
        DecisionLabel::Reject => (
            "Escalate to fraud investigation team",
            "Conduct thorough verification before proceeding",
        ),
    };

    format!(
        "**Risk Level: {level}**\n\n\
         **Key Factors:**\n\
         • Claim amount: {amount} (contributes to overall risk assessment)\n\
         • Incident type: {incident} (evaluated against historical patterns)\n\
         • Customer history score: {history:.1}/100\n\n\
         **Assessment:**\n\
         • Overall risk score: {risk:.2}/100\n\
         • Fraud probability: {probability}\n\n\
         **Recommended Action:**\n\
         • {first_action}\n\
         • {second_action}\n",
        level = outcome.risk_level(),
        amount = format_currency(claim.amount),
        incident = claim.incident_type,
        history = claim.history_score,
        risk = outcome.risk_score,
        probability = format_percent(outcome.fraud_probability),
    )
}

/// Formats an amount as dollars with thousands separators, e.g. `$12,345.67`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u128;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Formats a probability as a percentage with one decimal, e.g. `8.3%`
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{GeneratorBehavior, MockTextGenerator};
    use crate::scoring::ScoringEngine;

    fn claim() -> ClaimInput {
        ClaimInput::new("CLM-1", "CUST-1", 400.0, "collision", 20.0)
    }

    fn strategy(behavior: GeneratorBehavior, timeout: Duration) -> (ExplanationStrategy, Arc<MockTextGenerator>) {
        let generator = Arc::new(MockTextGenerator::new(behavior));
        let strategy = ExplanationStrategy::new(Some(generator.clone() as Arc<dyn TextGenerator>), timeout);
        (strategy, generator)
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(400.0), "$400.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-52.1), "-$52.10");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.5), "50.0%");
        assert_eq!(format_percent(0.08317), "8.3%");
    }

    #[test]
    fn test_prompt_embeds_all_factors() {
        let claim = claim();
        let outcome = ScoringEngine::score(&claim);
        let prompt = build_prompt(&claim, &outcome);

        assert!(prompt.contains("considered LOW risk"));
        assert!(prompt.contains("Amount: $400.00"));
        assert!(prompt.contains("Incident type: collision"));
        assert!(prompt.contains("history score: 20.0/100"));
        assert!(prompt.contains("Risk score: 26.00/100"));
        assert!(prompt.contains("Fraud probability: 8.3%"));
        assert!(prompt.contains("3 bullet reasons"));
    }

    #[test]
    fn test_template_actions_follow_decision() {
        let claim = claim();
        let mut outcome = ScoringEngine::score(&claim);

        outcome.decision = DecisionLabel::Approve;
        assert!(template_explanation(&claim, &outcome).contains("<2 hours"));

        outcome.decision = DecisionLabel::Review;
        let review = template_explanation(&claim, &outcome);
        assert!(review.contains("senior adjuster"));
        assert!(review.contains("additional documentation"));

        outcome.decision = DecisionLabel::Reject;
        let reject = template_explanation(&claim, &outcome);
        assert!(reject.contains("fraud investigation team"));
        assert!(reject.contains("verification"));
    }

    #[test]
    fn test_template_sections() {
        let claim = claim();
        let outcome = ScoringEngine::score(&claim);
        let text = template_explanation(&claim, &outcome);

        assert!(text.starts_with("**Risk Level: LOW**"));
        assert!(text.contains("**Key Factors:**"));
        assert!(text.contains("**Assessment:**"));
        assert!(text.contains("Fraud probability: 8.3%"));
        assert!(text.contains("**Recommended Action:**"));
    }

    #[test]
    fn test_template_layout() {
        let claim = claim();
        let outcome = ScoringEngine::score(&claim);
        let text = template_explanation(&claim, &outcome);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "**Risk Level: LOW**",
                "",
                "**Key Factors:**",
                "• Claim amount: $400.00 (contributes to overall risk assessment)",
                "• Incident type: collision (evaluated against historical patterns)",
                "• Customer history score: 20.0/100",
                "",
                "**Assessment:**",
                "• Overall risk score: 26.00/100",
                "• Fraud probability: 8.3%",
                "",
                "**Recommended Action:**",
                "• Auto-approve this claim for fast-track processing",
                "• Estimated processing time: <2 hours",
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_text_used_when_available() {
        let (strategy, generator) =
            strategy(GeneratorBehavior::Respond("  Three reasons.  ".to_string()), Duration::from_secs(1));
        let claim = claim();
        let outcome = ScoringEngine::score(&claim);

        let explanation = strategy.explain(&claim, &outcome).await;
        assert_eq!(explanation.source, ExplanationSource::Remote);
        assert_eq!(explanation.text, "Three reasons.");
        assert_eq!(generator.prompts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let (strategy, _) = strategy(GeneratorBehavior::Fail, Duration::from_secs(1));
        let claim = claim();
        let explanation = strategy.explain(&claim, &ScoringEngine::score(&claim)).await;
        assert_eq!(explanation.source, ExplanationSource::Template);
        assert!(!explanation.text.is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_on_empty_text() {
        let (strategy, _) = strategy(GeneratorBehavior::Respond("   ".to_string()), Duration::from_secs(1));
        let claim = claim();
        let explanation = strategy.explain(&claim, &ScoringEngine::score(&claim)).await;
        assert_eq!(explanation.source, ExplanationSource::Template);
    }

    #[tokio::test]
    async fn test_falls_back_when_unavailable() {
        let (strategy, generator) = strategy(GeneratorBehavior::Unavailable, Duration::from_secs(1));
        let claim = claim();
        let explanation = strategy.explain(&claim, &ScoringEngine::score(&claim)).await;
        assert_eq!(explanation.source, ExplanationSource::Template);
        assert!(generator.prompts().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_treated_as_failure() {
        let (strategy, _) = strategy(GeneratorBehavior::Hang, Duration::from_secs(30));
        let claim = claim();
        let explanation = strategy.explain(&claim, &ScoringEngine::score(&claim)).await;
        assert_eq!(explanation.source, ExplanationSource::Template);
    }

    #[tokio::test]
    async fn test_template_only_never_calls_out() {
        let claim = claim();
        let explanation = ExplanationStrategy::template_only()
            .explain(&claim, &ScoringEngine::score(&claim))
            .await;
        assert_eq!(explanation.source, ExplanationSource::Template);
    }
}
