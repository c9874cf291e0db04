//! Custom Test Assertions
//!
//! Assertions over a decision and its audit trail with messages that name
//! the mismatching field.

use domain_scoring::decision::DECISION_CREATED;
use domain_scoring::{AuditPayload, ClaimInput, Decision, DecisionWithAudit};

/// Asserts the trail holds exactly one `decision_created` event whose
/// output equals the decision's values, and returns its payload's input
///
/// # Panics
///
/// Panics if the trail is malformed
pub fn assert_decision_matches_audit(detail: &DecisionWithAudit) -> ClaimInput {
    let created: Vec<_> = detail
        .audit_events
        .iter()
        .filter(|event| event.event_type() == DECISION_CREATED)
        .collect();
    assert_eq!(
        created.len(),
        1,
        "Expected exactly one {} event for {}, found {}",
        DECISION_CREATED,
        detail.decision.decision_id,
        created.len()
    );

    let event = created[0];
    assert_eq!(event.decision_id, detail.decision.decision_id, "Audit event points at another decision");

    match &event.payload {
        AuditPayload::DecisionCreated(payload) => {
            assert_eq!(
                payload.output,
                detail.decision.outcome(),
                "Audit output differs from decision {}",
                detail.decision.decision_id
            );
            assert_eq!(payload.input.claim_id, detail.decision.claim_id, "claim_id mismatch");
            assert_eq!(payload.input.customer_id, detail.decision.customer_id, "customer_id mismatch");
            payload.input.clone()
        }
        other => panic!("Expected {} payload, got {:?}", DECISION_CREATED, other),
    }
}

/// Asserts decisions are ordered newest first
pub fn assert_newest_first(decisions: &[Decision]) {
    for pair in decisions.windows(2) {
        assert!(
            pair[0].created_at >= pair[1].created_at,
            "Decisions out of order: {} ({}) before {} ({})",
            pair[0].decision_id,
            pair[0].created_at,
            pair[1].decision_id,
            pair[1].created_at
        );
    }
}
