//! Reaction entity <-> model mapper

use chrono::{DateTime, Utc};
use uuid::Uuid;

use engage_core::entities::{ReactionKind, ReactionRecord, ReactionTally, TargetKind};
use engage_core::error::DomainError;

use crate::models::{CounterRowModel, ReactionModel, ReactionTallyModel};

/// Convert ReactionModel to ReactionRecord entity
///
/// Kind columns are free text in the row; an unknown value means the table was
/// written by something other than this crate.
impl TryFrom<ReactionModel> for ReactionRecord {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let target_kind: TargetKind = model
            .entity_type
            .parse()
            .map_err(|e| DomainError::InternalError(format!("reaction {}: {e}", model.id)))?;
        let reaction_kind: ReactionKind = model
            .reaction_type
            .parse()
            .map_err(|e| DomainError::InternalError(format!("reaction {}: {e}", model.id)))?;

        Ok(ReactionRecord {
            id: model.id,
            user_id: model.user_id,
            target_kind,
            target_id: model.entity_id,
            reaction_kind,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<ReactionTallyModel> for ReactionTally {
    fn from(model: ReactionTallyModel) -> Self {
        ReactionTally::new(model.like_count, model.favorite_count)
    }
}

impl From<CounterRowModel> for ReactionTally {
    fn from(model: CounterRowModel) -> Self {
        ReactionTally::new(model.like_count, model.favorite_count)
    }
}

/// Convert ReactionRecord entity reference to values for database insertion
pub struct ReactionInsert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entity_type: &'static str,
    pub entity_id: Uuid,
    pub reaction_type: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReactionInsert {
    pub fn new(record: &ReactionRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            entity_type: record.target_kind.as_str(),
            entity_id: record.target_id,
            reaction_type: record.reaction_kind.as_str(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(entity_type: &str, reaction_type: &str) -> ReactionModel {
        let now = Utc::now();
        ReactionModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            entity_type: entity_type.to_string(),
            entity_id: Uuid::new_v4(),
            reaction_type: reaction_type.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_record() {
        let row = model("professional", "favorite");
        let record = ReactionRecord::try_from(row.clone()).unwrap();

        assert_eq!(record.id, row.id);
        assert_eq!(record.target_kind, TargetKind::Professional);
        assert_eq!(record.target_id, row.entity_id);
        assert_eq!(record.reaction_kind, ReactionKind::Favorite);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = ReactionRecord::try_from(model("comment", "like")).unwrap_err();
        assert!(matches!(err, DomainError::InternalError(_)));

        let err = ReactionRecord::try_from(model("event", "love")).unwrap_err();
        assert!(matches!(err, DomainError::InternalError(_)));
    }

    #[test]
    fn test_insert_uses_storage_names() {
        let row = model("event", "like");
        let record = ReactionRecord::try_from(row).unwrap();
        let insert = ReactionInsert::new(&record);

        assert_eq!(insert.entity_type, "event");
        assert_eq!(insert.reaction_type, "like");
        assert_eq!(insert.id, record.id);
    }
}
