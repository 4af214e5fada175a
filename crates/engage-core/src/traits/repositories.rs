//! Repository traits (ports) - define the interface for data access
//!
//! The write side is transactional: [`ReactionLedger::begin`] hands out a
//! [`LedgerTransaction`] that is both the reaction store and the counter
//! gateway for the duration of one logical operation. Nothing written through
//! it is visible until [`LedgerTransaction::commit`]; dropping it without
//! committing discards every change.
//!
//! The read side ([`ReactionQueryRepository`]) runs outside any write
//! transaction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    CounterDelta, CounterField, ReactionKey, ReactionKind, ReactionRecord, ReactionTally, TargetRef,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Store
// ============================================================================

#[async_trait]
pub trait ReactionStore: Send {
    /// Find the reaction with this natural key, locking it for the transaction
    async fn find_existing(&mut self, key: &ReactionKey) -> RepoResult<Option<ReactionRecord>>;

    /// Find a reaction by id, locking it for the transaction
    async fn find_by_id(&mut self, id: Uuid) -> RepoResult<Option<ReactionRecord>>;

    /// Insert a new reaction
    ///
    /// Fails with `ReactionAlreadyExists` when the storage-level unique
    /// constraint on the natural key rejects the row.
    async fn insert(&mut self, record: &ReactionRecord) -> RepoResult<ReactionRecord>;

    /// Change the reaction kind in place, keeping id and created_at
    async fn update_kind(&mut self, id: Uuid, kind: ReactionKind) -> RepoResult<ReactionRecord>;

    /// Physically remove a reaction; `ReactionNotFound` if it is already gone
    async fn remove(&mut self, id: Uuid) -> RepoResult<()>;

    /// Check that the reacting user exists
    async fn user_exists(&mut self, user_id: Uuid) -> RepoResult<bool>;

    /// Count live reactions on a target, grouped by kind
    async fn live_tally(&mut self, target: TargetRef) -> RepoResult<ReactionTally>;
}

// ============================================================================
// Target Counter Gateway
// ============================================================================

#[async_trait]
pub trait TargetCounterGateway: Send {
    /// Atomically nudge one counter on a target row
    ///
    /// Fails with `TargetNotFound` if no such row exists, and with
    /// `CounterUpdateFailed` on any storage fault.
    async fn adjust(
        &mut self,
        target: TargetRef,
        field: CounterField,
        delta: CounterDelta,
    ) -> RepoResult<()>;

    /// Read the stored counters of a target
    async fn read_counters(&mut self, target: TargetRef) -> RepoResult<ReactionTally>;

    /// Overwrite the stored counters of a target
    async fn overwrite_counters(&mut self, target: TargetRef, tally: ReactionTally)
        -> RepoResult<()>;
}

// ============================================================================
// Transaction scope
// ============================================================================

#[async_trait]
pub trait LedgerTransaction: ReactionStore + TargetCounterGateway {
    /// Make every change visible atomically
    async fn commit(self: Box<Self>) -> RepoResult<()>;

    /// Discard every change
    async fn rollback(self: Box<Self>) -> RepoResult<()>;
}

#[async_trait]
pub trait ReactionLedger: Send + Sync {
    /// Open a new transaction scope
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> RepoResult<()>;
}

// ============================================================================
// Query Repository
// ============================================================================

#[async_trait]
pub trait ReactionQueryRepository: Send + Sync {
    /// Find reaction by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ReactionRecord>>;

    /// List every reaction, newest first
    async fn find_all(&self) -> RepoResult<Vec<ReactionRecord>>;

    /// List reactions made by a user
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<ReactionRecord>>;

    /// List reactions on a target
    async fn find_by_target(&self, target: TargetRef) -> RepoResult<Vec<ReactionRecord>>;
}
