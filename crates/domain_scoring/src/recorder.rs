//! Decision recorder
//!
//! Orchestrates one pipeline run: validate, score, explain, then write the
//! decision and its `decision_created` audit event atomically through the
//! [`DecisionStore`]. After the write commits, a copy of the raw claim is
//! forwarded to the archive on a spawned task; that step can fail or be
//! skipped without affecting the returned decision.
//!
//! Dropping the future returned by [`DecisionRecorder::score_claim`] before
//! the store commits leaves nothing behind, because the store's transaction
//! is rolled back when it is dropped.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span, warn, Instrument};

use core_kernel::{DecisionId, HealthCheckResult, PortError, TraceId};

use crate::claim::ClaimInput;
use crate::decision::{
    Decision, DecisionCreatedPayload, DecisionPage, DecisionWithAudit, ModelVersions,
    NewAuditEvent, NewDecision,
};
use crate::error::ScoringError;
use crate::explanation::ExplanationStrategy;
use crate::ports::{ArchivedClaim, ClaimArchive, DecisionStore};
use crate::scoring::ScoringEngine;

/// Default bound on one archival forward
pub const DEFAULT_ARCHIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Application service that produces and records decisions
#[derive(Clone)]
pub struct DecisionRecorder {
    store: Arc<dyn DecisionStore>,
    explainer: ExplanationStrategy,
    archive: Option<Arc<dyn ClaimArchive>>,
    archive_timeout: Duration,
    versions: ModelVersions,
}

impl DecisionRecorder {
    pub fn new(
        store: Arc<dyn DecisionStore>,
        explainer: ExplanationStrategy,
        versions: ModelVersions,
    ) -> Self {
        Self {
            store,
            explainer,
            archive: None,
            archive_timeout: DEFAULT_ARCHIVE_TIMEOUT,
            versions,
        }
    }

    /// Attaches the archival store used after each commit
    pub fn with_archive(mut self, archive: Arc<dyn ClaimArchive>, timeout: Duration) -> Self {
        self.archive = Some(archive);
        self.archive_timeout = timeout;
        self
    }

    pub fn versions(&self) -> &ModelVersions {
        &self.versions
    }

    /// Runs the full pipeline for one claim
    pub async fn score_claim(&self, claim: ClaimInput) -> Result<Decision, ScoringError> {
        self.run(claim, &self.explainer).await
    }

    /// Runs the pipeline without consulting the remote generator
    pub async fn score_claim_template_only(&self, claim: ClaimInput) -> Result<Decision, ScoringError> {
        self.run(claim, &ExplanationStrategy::template_only()).await
    }

    async fn run(
        &self,
        claim: ClaimInput,
        explainer: &ExplanationStrategy,
    ) -> Result<Decision, ScoringError> {
        claim.validate()?;

        match TraceId::current() {
            Some(trace_id) => self.record(claim, explainer, trace_id).await,
            // Outside a request: the generated id becomes current for this run
            None => {
                let trace_id = TraceId::generate();
                trace_id
                    .clone()
                    .scope(self.record(claim, explainer, trace_id))
                    .await
            }
        }
    }

    async fn record(
        &self,
        claim: ClaimInput,
        explainer: &ExplanationStrategy,
        trace_id: TraceId,
    ) -> Result<Decision, ScoringError> {
        info!(%trace_id, claim_id = %claim.claim_id, "Scoring claim");

        let outcome = ScoringEngine::score(&claim);
        let explanation = explainer.explain(&claim, &outcome).await;

        let new_decision = NewDecision::new(&claim, &outcome, explanation.text, &self.versions);
        let decision_id = new_decision.decision_id;
        let audit = NewAuditEvent::decision_created(
            decision_id,
            DecisionCreatedPayload {
                trace_id: trace_id.clone(),
                input: claim.clone(),
                output: outcome,
                explanation_source: Some(explanation.source),
            },
        );

        let decision = self
            .store
            .record_decision(new_decision, audit)
            .await
            .map_err(|e| {
                error!(%trace_id, claim_id = %claim.claim_id, error = %e, "Failed to record decision");
                ScoringError::failed(e)
            })?;

        info!(
            %trace_id,
            decision_id = %decision.decision_id,
            decision = %decision.decision,
            risk_score = decision.risk_score,
            "Decision recorded"
        );

        self.forward_to_archive(&claim, decision_id, trace_id);
        Ok(decision)
    }

    fn forward_to_archive(&self, claim: &ClaimInput, decision_id: DecisionId, trace_id: TraceId) {
        let Some(archive) = self.archive.clone() else {
            return;
        };
        if !archive.is_available() {
            debug!(%trace_id, "Claim archive unavailable, skipping");
            return;
        }

        let record = match ArchivedClaim::from_claim(claim, decision_id) {
            Ok(record) => record,
            Err(e) => {
                warn!(%trace_id, error = %e, "Could not build archival record");
                return;
            }
        };

        let timeout = self.archive_timeout;
        let span = info_span!("archive_forward", trace_id = %trace_id, decision_id = %decision_id);
        tokio::spawn(
            trace_id
                .scope(async move {
                    let claim_id = record.claim_id.clone();
                    match tokio::time::timeout(timeout, archive.store_claim(record)).await {
                        Ok(Ok(())) => debug!(%claim_id, "Archived claim"),
                        Ok(Err(e)) => warn!(%claim_id, error = %e, "Failed to archive claim"),
                        Err(_) => warn!(%claim_id, ?timeout, "Archiving claim timed out"),
                    }
                })
                .instrument(span),
        );
    }

    /// Lists recorded decisions, newest first
    pub async fn list_decisions(&self, page: DecisionPage) -> Result<Vec<Decision>, PortError> {
        self.store.list_decisions(page).await
    }

    /// Fetches one decision with its audit trail
    pub async fn get_decision(&self, id: DecisionId) -> Result<Option<DecisionWithAudit>, PortError> {
        self.store.get_decision(id).await
    }

    pub async fn store_health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }
}
