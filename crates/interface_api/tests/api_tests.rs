//! HTTP round trips against the in-memory pipeline

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_scoring::{AuditPayload, GeneratorBehavior};
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{init_test_tracing, ClaimInputBuilder, MockPipeline};

fn server_with(pipeline: &MockPipeline, config: ApiConfig) -> TestServer {
    init_test_tracing();
    let state = AppState::new(pipeline.recorder.clone(), config);
    TestServer::new(create_router(state)).unwrap()
}

fn server(pipeline: &MockPipeline) -> TestServer {
    server_with(pipeline, ApiConfig::default())
}

fn claim_body() -> Value {
    ClaimInputBuilder::new().with_claim_id("CLM-API-1").build_json()
}

#[tokio::test]
async fn test_score_returns_flattened_decision() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    let response = server.post("/api/claim/score").json(&claim_body()).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["claim_id"], "CLM-API-1");
    assert_eq!(body["risk_score"], 26.0);
    assert_eq!(body["decision"], "APPROVE");
    assert_eq!(body["model_version"], "rb-v1");
    assert_eq!(body["policy_version"], "policy-v1");
    assert!(body["decision_id"].is_string());
    assert!(body["timestamp"].is_string());
    assert!(!body["explanation"].as_str().unwrap().is_empty());

    assert_eq!(pipeline.store.decisions().await.len(), 1);
}

#[tokio::test]
async fn test_remote_explanation_returned() {
    let pipeline = MockPipeline::new(GeneratorBehavior::Respond("Looks routine.".to_string()));
    let server = server(&pipeline);

    let response = server.post("/api/claim/score").json(&claim_body()).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["explanation"], "Looks routine.");
}

#[tokio::test]
async fn test_invalid_claim_rejected_before_pipeline() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);
    let body = ClaimInputBuilder::new().with_amount(0.0).build_json();

    let response = server.post("/api/claim/score").json(&body).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = response.json();
    assert_eq!(error["error"], "validation_error");
    assert!(error["details"][0].as_str().unwrap().starts_with("amount"));
    assert!(pipeline.store.decisions().await.is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    let response = server
        .post("/api/claim/score")
        .json(&json!({"claim_id": "CLM-1"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let pipeline = MockPipeline::template_only();
    let config = ApiConfig {
        api_key: Some("secret".to_string()),
        ..Default::default()
    };
    let server = server_with(&pipeline, config);

    let missing = server.post("/api/claim/score").json(&claim_body()).await;
    missing.assert_status(StatusCode::UNAUTHORIZED);

    let wrong = server
        .post("/api/claim/score")
        .add_header(HeaderName::from_static("x-api-key"), HeaderValue::from_static("nope"))
        .json(&claim_body())
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);

    let ok = server
        .post("/api/claim/score")
        .add_header(HeaderName::from_static("x-api-key"), HeaderValue::from_static("secret"))
        .json(&claim_body())
        .await;
    ok.assert_status_ok();

    // Reads stay open
    server.get("/api/decisions").await.assert_status_ok();
}

#[tokio::test]
async fn test_store_failure_is_scoring_failed() {
    let pipeline = MockPipeline::with_failing_store();
    let server = server(&pipeline);

    let response = server.post("/api/claim/score").json(&claim_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = response.json();
    assert_eq!(error["error"], "scoring_failed");
    assert!(error["message"].as_str().unwrap().starts_with("Scoring failed:"));
    assert!(pipeline.store.audit_events().await.is_empty());
}

#[tokio::test]
async fn test_archive_failure_does_not_affect_response() {
    let pipeline = MockPipeline::with_failing_archive();
    let server = server(&pipeline);

    let response = server.post("/api/claim/score").json(&claim_body()).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_trace_id_echoed_and_stamped_into_audit() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    let response = server
        .post("/api/claim/score")
        .add_header(HeaderName::from_static("x-trace-id"), HeaderValue::from_static("trace-xyz"))
        .json(&claim_body())
        .await;

    response.assert_status_ok();
    assert_eq!(response.headers()["x-trace-id"], "trace-xyz");

    let events = pipeline.store.audit_events().await;
    let AuditPayload::DecisionCreated(payload) = &events[0].payload else {
        panic!("expected decision_created payload");
    };
    assert_eq!(payload.trace_id.as_str(), "trace-xyz");
}

#[tokio::test]
async fn test_list_newest_first_with_limit_cap() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    for i in 0..3 {
        let body = ClaimInputBuilder::new()
            .with_claim_id(format!("CLM-LIST-{}", i))
            .build_json();
        server.post("/api/claim/score").json(&body).await.assert_status_ok();
    }

    let response = server.get("/api/decisions").add_query_param("limit", 2).await;
    response.assert_status_ok();
    let listed: Vec<Value> = response.json();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["claim_id"], "CLM-LIST-2");
    assert_eq!(listed[1]["claim_id"], "CLM-LIST-1");

    let offset: Vec<Value> = server
        .get("/api/decisions")
        .add_query_param("offset", 2)
        .await
        .json();
    assert_eq!(offset.len(), 1);
    assert_eq!(offset[0]["claim_id"], "CLM-LIST-0");

    server
        .get("/api/decisions")
        .add_query_param("limit", 201)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    server
        .get("/api/decisions")
        .add_query_param("offset", -1)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_decision_detail_includes_audit_trail() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    let scored: Value = server.post("/api/claim/score").json(&claim_body()).await.json();
    let id = scored["decision_id"].as_str().unwrap();

    let response = server.get(&format!("/api/decisions/{}", id)).await;
    response.assert_status_ok();

    let detail: Value = response.json();
    assert_eq!(detail["decision"]["decision_id"], scored["decision_id"]);
    assert_eq!(detail["decision"]["risk_score"], scored["risk_score"]);

    let events = detail["audit_events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_type"], "decision_created");
    assert_eq!(events[0]["event_payload"]["output"]["risk_score"], scored["risk_score"]);
    assert_eq!(events[0]["event_payload"]["input"]["claim_id"], "CLM-API-1");
}

#[tokio::test]
async fn test_unknown_decision_is_not_found() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    let response = server
        .get("/api/decisions/0190f0c2-0000-7000-8000-000000000000")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Decision not found");

    server
        .get("/api/decisions/not-a-uuid")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_models_lists_rule_based_model() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    let body: Value = server.get("/api/models").await.json();

    assert_eq!(body["models"][0]["name"], "rule-based-v1");
    assert_eq!(body["models"][0]["version"], "rb-v1");
    assert_eq!(body["models"][0]["type"], "deterministic");
    assert_eq!(body["models"][0]["status"], "active");
}

#[tokio::test]
async fn test_seed_disabled_without_token() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    server
        .post("/api/seed")
        .add_query_param("seed_token", "anything")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seed_records_demo_decisions() {
    let pipeline = MockPipeline::new(GeneratorBehavior::Respond("remote".to_string()));
    let config = ApiConfig {
        seed_token: Some("seed-me".to_string()),
        ..Default::default()
    };
    let server = server_with(&pipeline, config);

    let bad = server
        .post("/api/seed")
        .add_query_param("seed_token", "wrong")
        .await;
    bad.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(bad.json::<Value>()["message"], "Invalid seed token");

    server
        .post("/api/seed")
        .add_query_param("seed_token", "seed-me")
        .add_query_param("count", 101)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .post("/api/seed")
        .add_query_param("seed_token", "seed-me")
        .add_query_param("count", 3)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "Seeded 3 demo claims");

    let decisions = pipeline.store.decisions().await;
    assert_eq!(decisions.len(), 3);
    assert_eq!(pipeline.store.audit_events().await.len(), 3);
    // Seeding never consults the remote generator
    assert!(decisions.iter().all(|d| d.explanation != "remote"));
}

#[tokio::test]
async fn test_health_and_readiness() {
    let pipeline = MockPipeline::template_only();
    let server = server(&pipeline);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["status"], "healthy");

    server.get("/health/ready").await.assert_status_ok();
    server.get("/").await.assert_status_ok();

    pipeline.store.set_failing(true);
    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
