//! PostgreSQL implementation of the transactional ledger
//!
//! Every operation runs on the connection owned by one `sqlx::Transaction`.
//! Lookups take `FOR UPDATE` row locks so concurrent operations on the same
//! reaction serialize; the unique index on the natural key is the backstop for
//! concurrent inserts. Dropping a [`PgLedgerTransaction`] without committing
//! rolls the transaction back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;

use engage_core::entities::{
    CounterDelta, CounterField, ReactionKey, ReactionKind, ReactionRecord, ReactionTally, TargetRef,
};
use engage_core::error::DomainError;
use engage_core::traits::{
    LedgerTransaction, ReactionLedger, ReactionStore, RepoResult, TargetCounterGateway,
};

use crate::counters::adapter_for;
use crate::mappers::ReactionInsert;
use crate::models::{ReactionModel, ReactionTallyModel};

use super::error::{map_db_error, map_insert_error, map_unique_violation, reaction_not_found};

/// PostgreSQL reaction ledger
#[derive(Clone)]
pub struct PgReactionLedger {
    pool: PgPool,
}

impl PgReactionLedger {
    /// Create a new PgReactionLedger
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionLedger for PgReactionLedger {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgLedgerTransaction { tx }))
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

/// One open ledger transaction
pub struct PgLedgerTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReactionStore for PgLedgerTransaction {
    #[instrument(skip(self))]
    async fn find_existing(&mut self, key: &ReactionKey) -> RepoResult<Option<ReactionRecord>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            FROM user_reactions
            WHERE user_id = $1 AND entity_type = $2 AND entity_id = $3 AND reaction_type = $4
            FOR UPDATE
            "#,
        )
        .bind(key.user_id)
        .bind(key.target.kind.as_str())
        .bind(key.target.id)
        .bind(key.kind.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&mut self, id: Uuid) -> RepoResult<Option<ReactionRecord>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            FROM user_reactions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionRecord::try_from).transpose()
    }

    #[instrument(skip(self, record), fields(reaction_id = %record.id))]
    async fn insert(&mut self, record: &ReactionRecord) -> RepoResult<ReactionRecord> {
        let insert = ReactionInsert::new(record);

        let model = sqlx::query_as::<_, ReactionModel>(
            r#"
            INSERT INTO user_reactions
                (id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            "#,
        )
        .bind(insert.id)
        .bind(insert.user_id)
        .bind(insert.entity_type)
        .bind(insert.entity_id)
        .bind(insert.reaction_type)
        .bind(insert.created_at)
        .bind(insert.updated_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, record.user_id))?;

        ReactionRecord::try_from(model)
    }

    #[instrument(skip(self))]
    async fn update_kind(&mut self, id: Uuid, kind: ReactionKind) -> RepoResult<ReactionRecord> {
        let model = sqlx::query_as::<_, ReactionModel>(
            r#"
            UPDATE user_reactions
            SET reaction_type = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, entity_type, entity_id, reaction_type, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?
        .ok_or_else(|| reaction_not_found(id))?;

        ReactionRecord::try_from(model)
    }

    #[instrument(skip(self))]
    async fn remove(&mut self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_reactions WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(reaction_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn user_exists(&mut self, user_id: Uuid) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn live_tally(&mut self, target: TargetRef) -> RepoResult<ReactionTally> {
        let tally = sqlx::query_as::<_, ReactionTallyModel>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE reaction_type = 'like') AS like_count,
                COUNT(*) FILTER (WHERE reaction_type = 'favorite') AS favorite_count
            FROM user_reactions
            WHERE entity_type = $1 AND entity_id = $2
            "#,
        )
        .bind(target.kind.as_str())
        .bind(target.id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(tally.into())
    }
}

#[async_trait]
impl TargetCounterGateway for PgLedgerTransaction {
    async fn adjust(
        &mut self,
        target: TargetRef,
        field: CounterField,
        delta: CounterDelta,
    ) -> RepoResult<()> {
        adapter_for(target.kind)
            .adjust(&mut *self.tx, target.id, field, delta)
            .await
    }

    async fn read_counters(&mut self, target: TargetRef) -> RepoResult<ReactionTally> {
        adapter_for(target.kind).read(&mut *self.tx, target.id).await
    }

    async fn overwrite_counters(
        &mut self,
        target: TargetRef,
        tally: ReactionTally,
    ) -> RepoResult<()> {
        adapter_for(target.kind)
            .overwrite(&mut *self.tx, target.id, tally)
            .await
    }
}

#[async_trait]
impl LedgerTransaction for PgLedgerTransaction {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)?;
        debug!("Ledger transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        self.tx.rollback().await.map_err(map_db_error)?;
        debug!("Ledger transaction rolled back");
        Ok(())
    }
}
