//! Reaction ledger service
//!
//! Every write runs in exactly one ledger transaction: the reaction row change
//! and the matching counter adjustments either all commit or all roll back.
//! Failures are returned to the caller as-is and never retried here.
//!
//! Per (user, target, kind) a reaction is either absent or present:
//!
//! | from    | operation         | to      | counter |
//! |---------|-------------------|---------|---------|
//! | absent  | create / toggle   | present | +1      |
//! | present | delete / toggle   | absent  | -1      |
//! | present | create            | present | none, `ReactionAlreadyExists` |
//! | absent  | delete            | absent  | none, `ReactionNotFound` |

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use engage_core::entities::{
    CounterAudit, CounterDelta, ReactionKey, ReactionKind, ReactionRecord, TargetRef,
    ToggleOutcome,
};
use engage_core::error::DomainError;
use engage_core::traits::{LedgerTransaction, RepoResult};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// How an existing reaction is addressed by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionSelector {
    /// By reaction id; the reaction must belong to the caller
    Id(Uuid),
    /// By the caller's own reaction of `kind` on `target`
    Key { target: TargetRef, kind: ReactionKind },
}

/// Reaction ledger service
pub struct ReactionLedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionLedgerService<'a> {
    /// Create a new ReactionLedgerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a new reaction and bump the matching counter
    ///
    /// # Errors
    /// `UserNotFound`, `TargetNotFound`, `ReactionAlreadyExists`, or a storage failure
    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn create(&self, key: ReactionKey) -> ServiceResult<ReactionRecord> {
        let mut tx = self.ctx.ledger().begin().await?;
        let result = add_reaction(tx.as_mut(), key).await;
        let record = finish(tx, result).await?;

        info!(reaction_id = %record.id, "Reaction created");
        Ok(record)
    }

    /// Change the kind of an existing reaction, moving one count between counters
    ///
    /// Changing to the kind the reaction already has returns it untouched.
    ///
    /// # Errors
    /// `ReactionNotFound`, `NotReactionOwner`, `ReactionAlreadyExists` when the
    /// caller already holds a reaction of the new kind, or a storage failure
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: Uuid,
        selector: ReactionSelector,
        kind: ReactionKind,
    ) -> ServiceResult<ReactionRecord> {
        let mut tx = self.ctx.ledger().begin().await?;
        let result = change_kind(tx.as_mut(), user_id, selector, kind).await;
        let record = finish(tx, result).await?;

        info!(reaction_id = %record.id, kind = %record.reaction_kind, "Reaction updated");
        Ok(record)
    }

    /// Remove a reaction and decrement the matching counter
    ///
    /// # Errors
    /// `ReactionNotFound`, `NotReactionOwner`, `TargetNotFound`, or a storage failure
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, selector: ReactionSelector) -> ServiceResult<()> {
        let mut tx = self.ctx.ledger().begin().await?;
        let result: RepoResult<Uuid> = async {
            let record = locate(tx.as_mut(), user_id, selector).await?;
            drop_reaction(tx.as_mut(), &record).await?;
            Ok(record.id)
        }
        .await;
        let id = finish(tx, result).await?;

        info!(reaction_id = %id, "Reaction deleted");
        Ok(())
    }

    /// Apply the reaction if absent, undo it if present
    ///
    /// The lookup and the mutation share one transaction; concurrent toggles on
    /// the same key serialize on the reaction row. A concurrent insert that
    /// wins the race surfaces as `ReactionAlreadyExists`.
    ///
    /// # Errors
    /// Same as [`Self::create`] or [`Self::delete`], depending on the branch taken
    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn toggle(&self, key: ReactionKey) -> ServiceResult<ToggleOutcome> {
        let mut tx = self.ctx.ledger().begin().await?;
        let result: RepoResult<ToggleOutcome> = async {
            match tx.find_existing(&key).await? {
                Some(record) => {
                    drop_reaction(tx.as_mut(), &record).await?;
                    Ok(ToggleOutcome::Removed)
                }
                None => add_reaction(tx.as_mut(), key).await.map(ToggleOutcome::Added),
            }
        }
        .await;
        let outcome = finish(tx, result).await?;

        info!(action = outcome.action(), "Reaction toggled");
        Ok(outcome)
    }

    /// Compare a target's stored counters with its live reaction count
    ///
    /// # Errors
    /// `TargetNotFound`, or a storage failure
    #[instrument(skip(self))]
    pub async fn audit(&self, target: TargetRef) -> ServiceResult<CounterAudit> {
        let mut tx = self.ctx.ledger().begin().await?;
        let result = read_audit(tx.as_mut(), target).await;
        let audit = finish(tx, result).await?;

        if !audit.in_sync() {
            warn!(%target, stored = ?audit.stored, live = ?audit.live, "Counter drift detected");
        }
        Ok(audit)
    }

    /// Overwrite a target's stored counters with its live reaction count
    ///
    /// Returns the audit taken before the repair; afterwards the stored
    /// counters equal `live`.
    ///
    /// # Errors
    /// `TargetNotFound`, or a storage failure
    #[instrument(skip(self))]
    pub async fn reconcile(&self, target: TargetRef) -> ServiceResult<CounterAudit> {
        let mut tx = self.ctx.ledger().begin().await?;
        let result: RepoResult<CounterAudit> = async {
            let audit = read_audit(tx.as_mut(), target).await?;
            if !audit.in_sync() {
                tx.overwrite_counters(target, audit.live).await?;
            }
            Ok(audit)
        }
        .await;
        let audit = finish(tx, result).await?;

        if audit.in_sync() {
            debug!(%target, "Counters already in sync");
        } else {
            info!(%target, stored = ?audit.stored, live = ?audit.live, "Counters reconciled");
        }
        Ok(audit)
    }
}

/// Commit on success, roll back on failure
///
/// A failed rollback is only logged: the transaction is abandoned either way
/// and the caller needs the original error.
async fn finish<T>(
    tx: Box<dyn LedgerTransaction>,
    result: Result<T, DomainError>,
) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Ledger rollback failed");
            }
            if err.is_conflict() {
                debug!(error = %err, "Ledger operation rejected");
            }
            Err(err.into())
        }
    }
}

/// Absent -> present
async fn add_reaction(
    tx: &mut dyn LedgerTransaction,
    key: ReactionKey,
) -> RepoResult<ReactionRecord> {
    if !tx.user_exists(key.user_id).await? {
        return Err(DomainError::UserNotFound(key.user_id));
    }
    if tx.find_existing(&key).await?.is_some() {
        return Err(DomainError::ReactionAlreadyExists);
    }

    let record = tx.insert(&ReactionRecord::new(key)).await?;
    tx.adjust(key.target, key.kind.counter_field(), CounterDelta::Increment)
        .await?;
    Ok(record)
}

/// Present -> absent
async fn drop_reaction(
    tx: &mut dyn LedgerTransaction,
    record: &ReactionRecord,
) -> RepoResult<()> {
    tx.remove(record.id).await?;
    tx.adjust(
        record.target(),
        record.reaction_kind.counter_field(),
        CounterDelta::Decrement,
    )
    .await
}

async fn change_kind(
    tx: &mut dyn LedgerTransaction,
    user_id: Uuid,
    selector: ReactionSelector,
    kind: ReactionKind,
) -> RepoResult<ReactionRecord> {
    let record = locate(tx, user_id, selector).await?;
    if record.reaction_kind == kind {
        return Ok(record);
    }

    if tx.find_existing(&record.key().with_kind(kind)).await?.is_some() {
        return Err(DomainError::ReactionAlreadyExists);
    }

    let updated = tx.update_kind(record.id, kind).await?;
    let target = record.target();
    tx.adjust(target, record.reaction_kind.counter_field(), CounterDelta::Decrement)
        .await?;
    tx.adjust(target, kind.counter_field(), CounterDelta::Increment)
        .await?;
    Ok(updated)
}

/// Resolve a selector to a locked record owned by `user_id`
async fn locate(
    tx: &mut dyn LedgerTransaction,
    user_id: Uuid,
    selector: ReactionSelector,
) -> RepoResult<ReactionRecord> {
    match selector {
        ReactionSelector::Id(id) => {
            let record = tx
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::reaction_not_found(id))?;
            if !record.is_owned_by(user_id) {
                return Err(DomainError::NotReactionOwner);
            }
            Ok(record)
        }
        ReactionSelector::Key { target, kind } => {
            let key = ReactionKey::new(user_id, target, kind);
            tx.find_existing(&key)
                .await?
                .ok_or_else(|| DomainError::ReactionNotFound(key.to_string()))
        }
    }
}

async fn read_audit(
    tx: &mut dyn LedgerTransaction,
    target: TargetRef,
) -> RepoResult<CounterAudit> {
    let stored = tx.read_counters(target).await?;
    let live = tx.live_tally(target).await?;
    Ok(CounterAudit {
        target,
        stored,
        live,
    })
}
