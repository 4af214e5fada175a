//! PostgreSQL implementation of ReactionQueryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use engage_core::entities::{ReactionRecord, TargetRef};
use engage_core::traits::{ReactionQueryRepository, RepoResult};

use crate::models::ReactionModel;

use super::error::map_db_error;

fn into_records(models: Vec<ReactionModel>) -> RepoResult<Vec<ReactionRecord>> {
    models.into_iter().map(ReactionRecord::try_from).collect()
}

/// Read-only reaction projections, outside any write transaction
#[derive(Clone)]
pub struct PgReactionQueryRepository {
    pool: PgPool,
}

impl PgReactionQueryRepository {
    /// Create a new PgReactionQueryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionQueryRepository for PgReactionQueryRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ReactionRecord>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            FROM user_reactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<ReactionRecord>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            FROM user_reactions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_records(results)
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<ReactionRecord>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            FROM user_reactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_records(results)
    }

    #[instrument(skip(self))]
    async fn find_by_target(&self, target: TargetRef) -> RepoResult<Vec<ReactionRecord>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            FROM user_reactions
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(target.kind.as_str())
        .bind(target.id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_records(results)
    }
}
