//! Decision read-side DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_scoring::decision::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use domain_scoring::{AuditEvent, DecisionPage, DecisionWithAudit};

use super::claims::DecisionResponse;

/// `?limit&offset` for the decision listing
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListDecisionsQuery {
    #[validate(range(max = 200, message = "must be at most 200"))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListDecisionsQuery {
    pub fn page(&self) -> DecisionPage {
        DecisionPage::new(
            self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditEventResponse {
    pub event_type: String,
    pub event_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditEvent> for AuditEventResponse {
    type Error = serde_json::Error;

    fn try_from(event: AuditEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            event_payload: event.payload.to_json()?,
            created_at: event.created_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionDetailResponse {
    pub decision: DecisionResponse,
    pub audit_events: Vec<AuditEventResponse>,
}

impl TryFrom<DecisionWithAudit> for DecisionDetailResponse {
    type Error = serde_json::Error;

    fn try_from(detail: DecisionWithAudit) -> Result<Self, Self::Error> {
        let audit_events = detail
            .audit_events
            .into_iter()
            .map(AuditEventResponse::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            decision: detail.decision.into(),
            audit_events,
        })
    }
}
