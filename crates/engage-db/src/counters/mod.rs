//! Target counter adapters
//!
//! Every target kind lives in its own table and carries `like_count` and
//! `favorite_count` columns. Each kind gets its own adapter type; the ledger
//! resolves the adapter from the reaction's target kind with [`adapter_for`].

mod adapters;

use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::{debug, instrument};
use uuid::Uuid;

use engage_core::entities::{CounterDelta, CounterField, ReactionTally, TargetKind, TargetRef};
use engage_core::error::DomainError;
use engage_core::traits::RepoResult;

use crate::models::CounterRowModel;
use crate::repositories::error::{map_counter_error, map_db_error};

pub use adapters::{ArticleCounters, BusinessCounters, EventCounters, ProfessionalCounters};

/// Static description of a target table
pub trait CounterTable {
    /// Target kind stored in this table
    const KIND: TargetKind;
    /// Table name
    const TABLE: &'static str;
}

/// Counter operations on one target table, run on the caller's connection
#[async_trait]
pub trait CounterAdapter: Send + Sync {
    fn kind(&self) -> TargetKind;

    /// `counter = GREATEST(counter + delta, 0)` as one statement
    async fn adjust(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        field: CounterField,
        delta: CounterDelta,
    ) -> RepoResult<()>;

    /// Read the stored counters, locking the target row
    async fn read(&self, conn: &mut PgConnection, id: Uuid) -> RepoResult<ReactionTally>;

    /// Replace both counters
    async fn overwrite(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        tally: ReactionTally,
    ) -> RepoResult<()>;
}

#[async_trait]
impl<T> CounterAdapter for T
where
    T: CounterTable + Send + Sync,
{
    fn kind(&self) -> TargetKind {
        T::KIND
    }

    #[instrument(skip(self, conn), fields(table = T::TABLE))]
    async fn adjust(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        field: CounterField,
        delta: CounterDelta,
    ) -> RepoResult<()> {
        let column = field.column();
        let sql = format!(
            "UPDATE {table} SET {column} = GREATEST({column} + $1, 0) WHERE id = $2",
            table = T::TABLE,
        );

        let result = sqlx::query(&sql)
            .bind(i64::from(delta.value()))
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(map_counter_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TargetNotFound(TargetRef::new(T::KIND, id)));
        }

        debug!(%id, %field, %delta, "Counter adjusted");
        Ok(())
    }

    #[instrument(skip(self, conn), fields(table = T::TABLE))]
    async fn read(&self, conn: &mut PgConnection, id: Uuid) -> RepoResult<ReactionTally> {
        let sql = format!(
            "SELECT like_count, favorite_count FROM {table} WHERE id = $1 FOR UPDATE",
            table = T::TABLE,
        );

        let row = sqlx::query_as::<_, CounterRowModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_db_error)?;

        row.map(ReactionTally::from)
            .ok_or_else(|| DomainError::TargetNotFound(TargetRef::new(T::KIND, id)))
    }

    #[instrument(skip(self, conn), fields(table = T::TABLE))]
    async fn overwrite(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        tally: ReactionTally,
    ) -> RepoResult<()> {
        let sql = format!(
            "UPDATE {table} SET like_count = $1, favorite_count = $2 WHERE id = $3",
            table = T::TABLE,
        );

        let result = sqlx::query(&sql)
            .bind(tally.like_count)
            .bind(tally.favorite_count)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(map_counter_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TargetNotFound(TargetRef::new(T::KIND, id)));
        }

        Ok(())
    }
}

/// Adapter responsible for a target kind
pub fn adapter_for(kind: TargetKind) -> &'static dyn CounterAdapter {
    match kind {
        TargetKind::Article => &ArticleCounters,
        TargetKind::Business => &BusinessCounters,
        TargetKind::Professional => &ProfessionalCounters,
        TargetKind::Event => &EventCounters,
    }
}
