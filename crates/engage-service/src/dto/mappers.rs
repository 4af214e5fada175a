//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use engage_core::entities::{CounterAudit, ReactionRecord, ToggleOutcome};

use super::responses::{CounterAuditResponse, ReactionResponse, ToggleResponse};

impl From<&ReactionRecord> for ReactionResponse {
    fn from(record: &ReactionRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            entity_type: record.target_kind,
            entity_id: record.target_id,
            reaction_type: record.reaction_kind,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<ReactionRecord> for ReactionResponse {
    fn from(record: ReactionRecord) -> Self {
        Self::from(&record)
    }
}

impl From<ToggleOutcome> for ToggleResponse {
    fn from(outcome: ToggleOutcome) -> Self {
        Self {
            action: outcome.action(),
            reaction: outcome.reaction().map(ReactionResponse::from),
        }
    }
}

impl From<CounterAudit> for CounterAuditResponse {
    fn from(audit: CounterAudit) -> Self {
        Self {
            entity_type: audit.target.kind,
            entity_id: audit.target.id,
            stored: audit.stored,
            live: audit.live,
            in_sync: audit.in_sync(),
        }
    }
}
