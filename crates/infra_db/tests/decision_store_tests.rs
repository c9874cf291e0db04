//! PostgreSQL adapter tests
//!
//! These start a Postgres container and need Docker:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use core_kernel::{AdapterHealth, DecisionId, HealthCheckable, PortError, TraceId};
use domain_scoring::{
    ArchivedClaim, ClaimArchive, DecisionCreatedPayload, DecisionPage, DecisionStore,
    ExplanationSource, ModelVersions, NewAuditEvent, NewDecision, ScoringEngine,
};
use infra_db::{PostgresClaimArchive, PostgresDecisionStore};
use test_utils::{
    assert_decision_matches_audit, assert_newest_first, ClaimFixtures, ClaimInputBuilder,
    TestDatabase,
};

fn new_rows(claim: &domain_scoring::ClaimInput) -> (NewDecision, NewAuditEvent) {
    let outcome = ScoringEngine::score(claim);
    let decision = NewDecision::new(claim, &outcome, "explanation".to_string(), &ModelVersions::default());
    let audit = NewAuditEvent::decision_created(
        decision.decision_id,
        DecisionCreatedPayload {
            trace_id: TraceId::generate(),
            input: claim.clone(),
            output: outcome,
            explanation_source: Some(ExplanationSource::Template),
        },
    );
    (decision, audit)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_record_and_read_back_with_audit() {
    let db = TestDatabase::new().await.unwrap();
    let store = PostgresDecisionStore::new(db.pool().clone());
    let claim = ClaimInputBuilder::new().with_claim_id("CLM-PG-1").build();
    let (decision, audit) = new_rows(&claim);

    let recorded = store.record_decision(decision, audit).await.unwrap();
    let detail = store
        .get_decision(recorded.decision_id)
        .await
        .unwrap()
        .expect("decision should exist");

    assert_eq!(detail.decision, recorded);
    let input = assert_decision_matches_audit(&detail);
    assert_eq!(input, claim);
    assert_eq!(detail.audit_events[0].created_at, recorded.created_at);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_failed_audit_insert_leaves_no_decision() {
    let db = TestDatabase::new().await.unwrap();
    let store = PostgresDecisionStore::new(db.pool().clone());
    let (decision, mut audit) = new_rows(&ClaimFixtures::mid_theft());
    let decision_id = decision.decision_id;

    // Reuse an existing audit id so the second insert hits the primary key
    let (first_decision, first_audit) = new_rows(&ClaimFixtures::small_collision());
    audit.id = first_audit.id;
    store.record_decision(first_decision, first_audit).await.unwrap();

    let err = store.record_decision(decision, audit).await.unwrap_err();
    assert!(matches!(err, PortError::Conflict { .. }));
    assert!(store.get_decision(decision_id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_out_of_range_score_rejected_by_schema() {
    let db = TestDatabase::new().await.unwrap();
    let store = PostgresDecisionStore::new(db.pool().clone());
    let (mut decision, audit) = new_rows(&ClaimFixtures::large_fire());
    decision.risk_score = 140.0;
    let decision_id = decision.decision_id;

    let err = store.record_decision(decision, audit).await.unwrap_err();
    assert!(matches!(err, PortError::Validation { .. }));
    assert!(store.get_decision(decision_id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_list_is_newest_first_and_paged() {
    let db = TestDatabase::new().await.unwrap();
    let store = PostgresDecisionStore::new(db.pool().clone());

    for i in 0..5 {
        let claim = ClaimInputBuilder::new().with_claim_id(format!("CLM-PAGE-{}", i)).build();
        let (decision, audit) = new_rows(&claim);
        store.record_decision(decision, audit).await.unwrap();
    }

    let first = store.list_decisions(DecisionPage::new(2, 0)).await.unwrap();
    let second = store.list_decisions(DecisionPage::new(2, 2)).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_newest_first(&first);
    assert!(first[1].created_at >= second[0].created_at);
    assert_ne!(first[1].decision_id, second[0].decision_id);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_unknown_decision_is_none() {
    let db = TestDatabase::new().await.unwrap();
    let store = PostgresDecisionStore::new(db.pool().clone());

    assert!(store.get_decision(DecisionId::new_v7()).await.unwrap().is_none());
    assert_eq!(store.health_check().await.status, AdapterHealth::Healthy);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_archive_stores_raw_claim() {
    let db = TestDatabase::new().await.unwrap();
    let archive = Arc::new(PostgresClaimArchive::new(db.pool().clone()));
    let claim = ClaimInputBuilder::new().with_claim_id("CLM-ARCHIVE-1").build();
    let decision_id = DecisionId::new_v7();

    assert!(archive.is_available());
    archive
        .store_claim(ArchivedClaim::from_claim(&claim, decision_id).unwrap())
        .await
        .unwrap();

    let rows = archive.repository().find_by_claim_id("CLM-ARCHIVE-1").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].decision_id, uuid_of(decision_id));
    assert_eq!(rows[0].payload["amount"], 400.0);
}

fn uuid_of(id: DecisionId) -> uuid::Uuid {
    id.into()
}
