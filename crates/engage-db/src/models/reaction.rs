//! Reaction database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the user_reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub reaction_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Live reaction counts on one target (from aggregate query)
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReactionTallyModel {
    pub like_count: i64,
    pub favorite_count: i64,
}

/// Stored counter columns of a target row
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CounterRowModel {
    pub like_count: i64,
    pub favorite_count: i64,
}
