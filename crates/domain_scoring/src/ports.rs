//! Decision Pipeline Ports
//!
//! The recorder depends on three collaborators, each behind a port trait so
//! the pipeline can run against PostgreSQL and Ollama in production and
//! against the in-memory mocks in tests:
//!
//! - **DecisionStore**: atomic Decision + AuditEvent writes and read projections
//! - **TextGenerator**: remote explanation source, optional
//! - **ClaimArchive**: best-effort archival of the raw claim, optional
//!
//! Optional collaborators expose `is_available()` so the pipeline degrades
//! deterministically when one is absent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DecisionId, DomainPort, HealthCheckable, PortError};

use crate::claim::ClaimInput;
use crate::decision::{Decision, DecisionPage, DecisionWithAudit, NewAuditEvent, NewDecision};

/// Persistence port for decisions and their audit trail
#[async_trait]
pub trait DecisionStore: DomainPort + HealthCheckable {
    /// Writes the decision and its audit event as one atomic unit
    ///
    /// Either both rows become visible or neither does. Returns the decision
    /// with its storage-assigned `created_at`.
    async fn record_decision(
        &self,
        decision: NewDecision,
        audit: NewAuditEvent,
    ) -> Result<Decision, PortError>;

    /// Lists decisions, newest first
    async fn list_decisions(&self, page: DecisionPage) -> Result<Vec<Decision>, PortError>;

    /// Fetches one decision with its audit events, oldest first
    async fn get_decision(&self, id: DecisionId) -> Result<Option<DecisionWithAudit>, PortError>;
}

/// Remote text-generation port
#[async_trait]
pub trait TextGenerator: DomainPort {
    /// Whether the generator is configured at all
    fn is_available(&self) -> bool;

    /// Produces free text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, PortError>;
}

/// Raw claim copy handed to the archival store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedClaim {
    pub claim_id: String,
    pub customer_id: String,
    pub payload: serde_json::Value,
    pub decision_id: DecisionId,
    pub received_at: DateTime<Utc>,
}

impl ArchivedClaim {
    pub fn from_claim(claim: &ClaimInput, decision_id: DecisionId) -> Result<Self, PortError> {
        let payload = serde_json::to_value(claim)
            .map_err(|e| PortError::transformation(format!("claim payload: {}", e)))?;
        Ok(Self {
            claim_id: claim.claim_id.clone(),
            customer_id: claim.customer_id.clone(),
            payload,
            decision_id,
            received_at: Utc::now(),
        })
    }
}

/// Archival store port; failures never affect a recorded decision
#[async_trait]
pub trait ClaimArchive: DomainPort {
    /// Whether the archive is configured and connected
    fn is_available(&self) -> bool;

    async fn store_claim(&self, claim: ArchivedClaim) -> Result<(), PortError>;
}

/// In-memory port implementations for testing
///
/// These keep everything in memory and are useful for exercising the
/// recorder and the HTTP layer without PostgreSQL or Ollama.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult, TraceId};

    use crate::decision::AuditEvent;

    #[derive(Debug, Default)]
    struct StoreState {
        decisions: Vec<Decision>,
        audit_events: Vec<AuditEvent>,
    }

    /// In-memory mock implementation of DecisionStore
    ///
    /// Both rows are pushed under one write lock, so readers never observe a
    /// decision without its audit event.
    #[derive(Debug, Default)]
    pub struct MockDecisionStore {
        state: Arc<RwLock<StoreState>>,
        fail_writes: AtomicBool,
    }

    impl MockDecisionStore {
        /// Creates a new mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// A store whose writes fail as if the database were down
        pub fn failing() -> Self {
            let store = Self::new();
            store.set_failing(true);
            store
        }

        pub fn set_failing(&self, failing: bool) {
            self.fail_writes.store(failing, Ordering::SeqCst);
        }

        pub async fn decisions(&self) -> Vec<Decision> {
            self.state.read().await.decisions.clone()
        }

        pub async fn audit_events(&self) -> Vec<AuditEvent> {
            self.state.read().await.audit_events.clone()
        }
    }

    impl DomainPort for MockDecisionStore {}

    #[async_trait]
    impl HealthCheckable for MockDecisionStore {
        async fn health_check(&self) -> HealthCheckResult {
            let failing = self.fail_writes.load(Ordering::SeqCst);
            let status = if failing { AdapterHealth::Unhealthy } else { AdapterHealth::Healthy };
            HealthCheckResult::new("mock-decision-store", status, Instant::now(), None)
        }
    }

    #[async_trait]
    impl DecisionStore for MockDecisionStore {
        async fn record_decision(
            &self,
            decision: NewDecision,
            audit: NewAuditEvent,
        ) -> Result<Decision, PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock store is failing"));
            }
            if audit.decision_id != decision.decision_id {
                return Err(PortError::validation("audit event references another decision"));
            }

            let mut state = self.state.write().await;
            // created_at never goes backwards in insertion order
            let now = Utc::now();
            let created_at = state
                .decisions
                .last()
                .map(|last| last.created_at.max(now))
                .unwrap_or(now);

            let decision = decision.into_decision(created_at);
            state.decisions.push(decision.clone());
            state.audit_events.push(audit.into_event(created_at));
            Ok(decision)
        }

        async fn list_decisions(&self, page: DecisionPage) -> Result<Vec<Decision>, PortError> {
            let state = self.state.read().await;
            Ok(state
                .decisions
                .iter()
                .rev()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .cloned()
                .collect())
        }

        async fn get_decision(&self, id: DecisionId) -> Result<Option<DecisionWithAudit>, PortError> {
            let state = self.state.read().await;
            let Some(decision) = state.decisions.iter().find(|d| d.decision_id == id) else {
                return Ok(None);
            };
            let audit_events = state
                .audit_events
                .iter()
                .filter(|event| event.decision_id == id)
                .cloned()
                .collect();
            Ok(Some(DecisionWithAudit {
                decision: decision.clone(),
                audit_events,
            }))
        }
    }

    /// How the mock generator answers
    #[derive(Debug, Clone)]
    pub enum GeneratorBehavior {
        Respond(String),
        Fail,
        /// Never answers within any reasonable timeout
        Hang,
        Unavailable,
    }

    /// In-memory mock implementation of TextGenerator
    #[derive(Debug)]
    pub struct MockTextGenerator {
        behavior: GeneratorBehavior,
        prompts: RwLock<Vec<String>>,
        traces: RwLock<Vec<Option<TraceId>>>,
    }

    impl MockTextGenerator {
        pub fn new(behavior: GeneratorBehavior) -> Self {
            Self {
                behavior,
                prompts: RwLock::new(Vec::new()),
                traces: RwLock::new(Vec::new()),
            }
        }

        /// Prompts received so far
        pub async fn prompts(&self) -> Vec<String> {
            self.prompts.read().await.clone()
        }

        /// Trace context current at each call
        pub async fn traces(&self) -> Vec<Option<TraceId>> {
            self.traces.read().await.clone()
        }
    }

    impl DomainPort for MockTextGenerator {}

    #[async_trait]
    impl TextGenerator for MockTextGenerator {
        fn is_available(&self) -> bool {
            !matches!(self.behavior, GeneratorBehavior::Unavailable)
        }

        async fn generate(&self, prompt: &str) -> Result<String, PortError> {
            self.prompts.write().await.push(prompt.to_string());
            self.traces.write().await.push(TraceId::current());
            match &self.behavior {
                GeneratorBehavior::Respond(text) => Ok(text.clone()),
                GeneratorBehavior::Fail => Err(PortError::unavailable("mock generator")),
                GeneratorBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                    Err(PortError::internal("mock generator woke up"))
                }
                GeneratorBehavior::Unavailable => Err(PortError::unavailable("mock generator")),
            }
        }
    }

    /// In-memory mock implementation of ClaimArchive
    #[derive(Debug, Default)]
    pub struct MockClaimArchive {
        claims: RwLock<Vec<ArchivedClaim>>,
        fail_writes: AtomicBool,
    }

    impl MockClaimArchive {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let archive = Self::new();
            archive.fail_writes.store(true, Ordering::SeqCst);
            archive
        }

        pub async fn claims(&self) -> Vec<ArchivedClaim> {
            self.claims.read().await.clone()
        }

        /// Waits until `count` claims were archived or two seconds pass
        ///
        /// Archival runs on a spawned task, so tests poll for it.
        pub async fn wait_for_claims(&self, count: usize) -> Vec<ArchivedClaim> {
            for _ in 0..200 {
                {
                    let claims = self.claims.read().await;
                    if claims.len() >= count {
                        return claims.clone();
                    }
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            self.claims().await
        }
    }

    impl DomainPort for MockClaimArchive {}

    #[async_trait]
    impl ClaimArchive for MockClaimArchive {
        fn is_available(&self) -> bool {
            true
        }

        async fn store_claim(&self, claim: ArchivedClaim) -> Result<(), PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock archive is failing"));
            }
            self.claims.write().await.push(claim);
            Ok(())
        }
    }
}
