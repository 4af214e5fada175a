//! In-process ledger backend
//!
//! Holds users, reactions and target counters behind one async mutex. A
//! transaction owns the mutex for its whole lifetime and works on a private
//! copy of the state, which is written back on commit. Transactions are
//! therefore fully serialized, and dropping one discards its copy.
//!
//! Counter adjustments can be made to fail on demand with
//! [`MemoryLedger::fail_counter_updates`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};
use uuid::Uuid;

use engage_core::entities::{
    CounterDelta, CounterField, ReactionKey, ReactionKind, ReactionRecord, ReactionTally, TargetRef,
};
use engage_core::error::DomainError;
use engage_core::traits::{
    LedgerTransaction, ReactionLedger, ReactionQueryRepository, ReactionStore, RepoResult,
    TargetCounterGateway,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashSet<Uuid>,
    reactions: HashMap<Uuid, ReactionRecord>,
    keys: HashMap<ReactionKey, Uuid>,
    counters: HashMap<TargetRef, ReactionTally>,
}

impl MemoryState {
    fn sorted(mut records: Vec<ReactionRecord>) -> Vec<ReactionRecord> {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    fn select<F>(&self, filter: F) -> Vec<ReactionRecord>
    where
        F: Fn(&ReactionRecord) -> bool,
    {
        Self::sorted(self.reactions.values().filter(|r| filter(r)).cloned().collect())
    }
}

/// In-memory reaction ledger
///
/// Test and local-development backend only: every transaction copies the
/// whole state, so each operation costs O(total reactions). Production runs
/// on [`crate::PgReactionLedger`].
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<MemoryState>>,
    fail_counters: Arc<AtomicBool>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user that may react
    pub async fn add_user(&self, user_id: Uuid) {
        self.state.lock().await.users.insert(user_id);
    }

    /// Register a target with zeroed counters
    pub async fn add_target(&self, target: TargetRef) {
        self.state
            .lock()
            .await
            .counters
            .entry(target)
            .or_default();
    }

    /// Force stored counters, bypassing the ledger
    pub async fn set_counters(&self, target: TargetRef, tally: ReactionTally) {
        self.state.lock().await.counters.insert(target, tally);
    }

    /// Stored counters of a target, if it exists
    pub async fn stored_counters(&self, target: TargetRef) -> Option<ReactionTally> {
        self.state.lock().await.counters.get(&target).copied()
    }

    /// Number of committed reactions
    pub async fn reaction_count(&self) -> usize {
        self.state.lock().await.reactions.len()
    }

    /// Make every subsequent counter adjustment fail with `CounterUpdateFailed`
    pub fn fail_counter_updates(&self, fail: bool) {
        self.fail_counters.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReactionLedger for MemoryLedger {
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = (*guard).clone();

        Ok(Box::new(MemoryTransaction {
            guard,
            working,
            fail_counters: Arc::clone(&self.fail_counters),
        }))
    }

    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ReactionQueryRepository for MemoryLedger {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ReactionRecord>> {
        Ok(self.state.lock().await.reactions.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<ReactionRecord>> {
        Ok(self.state.lock().await.select(|_| true))
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<ReactionRecord>> {
        Ok(self.state.lock().await.select(|r| r.user_id == user_id))
    }

    async fn find_by_target(&self, target: TargetRef) -> RepoResult<Vec<ReactionRecord>> {
        Ok(self.state.lock().await.select(|r| r.target() == target))
    }
}

/// Open in-memory transaction
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_counters: Arc<AtomicBool>,
}

impl MemoryTransaction {
    fn counters_mut(&mut self, target: TargetRef) -> RepoResult<&mut ReactionTally> {
        self.working
            .counters
            .get_mut(&target)
            .ok_or(DomainError::TargetNotFound(target))
    }
}

#[async_trait]
impl ReactionStore for MemoryTransaction {
    async fn find_existing(&mut self, key: &ReactionKey) -> RepoResult<Option<ReactionRecord>> {
        Ok(self
            .working
            .keys
            .get(key)
            .and_then(|id| self.working.reactions.get(id))
            .cloned())
    }

    async fn find_by_id(&mut self, id: Uuid) -> RepoResult<Option<ReactionRecord>> {
        Ok(self.working.reactions.get(&id).cloned())
    }

    #[instrument(skip(self, record), fields(reaction_id = %record.id))]
    async fn insert(&mut self, record: &ReactionRecord) -> RepoResult<ReactionRecord> {
        let key = record.key();
        if self.working.keys.contains_key(&key) {
            return Err(DomainError::ReactionAlreadyExists);
        }
        if !self.working.users.contains(&record.user_id) {
            return Err(DomainError::UserNotFound(record.user_id));
        }

        self.working.keys.insert(key, record.id);
        self.working.reactions.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn update_kind(&mut self, id: Uuid, kind: ReactionKind) -> RepoResult<ReactionRecord> {
        let old_key = self
            .working
            .reactions
            .get(&id)
            .map(ReactionRecord::key)
            .ok_or_else(|| DomainError::reaction_not_found(id))?;
        let new_key = old_key.with_kind(kind);

        if let Some(other) = self.working.keys.get(&new_key) {
            if *other != id {
                return Err(DomainError::ReactionAlreadyExists);
            }
        }

        self.working.keys.remove(&old_key);
        self.working.keys.insert(new_key, id);

        let record = self
            .working
            .reactions
            .get_mut(&id)
            .ok_or_else(|| DomainError::reaction_not_found(id))?;
        record.reaction_kind = kind;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn remove(&mut self, id: Uuid) -> RepoResult<()> {
        let record = self
            .working
            .reactions
            .remove(&id)
            .ok_or_else(|| DomainError::reaction_not_found(id))?;
        self.working.keys.remove(&record.key());
        Ok(())
    }

    async fn user_exists(&mut self, user_id: Uuid) -> RepoResult<bool> {
        Ok(self.working.users.contains(&user_id))
    }

    async fn live_tally(&mut self, target: TargetRef) -> RepoResult<ReactionTally> {
        let mut tally = ReactionTally::default();
        for record in self.working.reactions.values() {
            if record.target() == target {
                tally.apply(record.reaction_kind.counter_field(), CounterDelta::Increment);
            }
        }
        Ok(tally)
    }
}

#[async_trait]
impl TargetCounterGateway for MemoryTransaction {
    #[instrument(skip(self))]
    async fn adjust(
        &mut self,
        target: TargetRef,
        field: CounterField,
        delta: CounterDelta,
    ) -> RepoResult<()> {
        if self.fail_counters.load(Ordering::SeqCst) {
            return Err(DomainError::CounterUpdateFailed(
                "injected counter failure".to_string(),
            ));
        }

        self.counters_mut(target)?.apply(field, delta);
        Ok(())
    }

    async fn read_counters(&mut self, target: TargetRef) -> RepoResult<ReactionTally> {
        self.counters_mut(target).map(|tally| *tally)
    }

    async fn overwrite_counters(
        &mut self,
        target: TargetRef,
        tally: ReactionTally,
    ) -> RepoResult<()> {
        *self.counters_mut(target)? = tally;
        Ok(())
    }
}

#[async_trait]
impl LedgerTransaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        debug!("Memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        debug!("Memory transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engage_core::entities::TargetKind;

    async fn seeded() -> (MemoryLedger, Uuid, TargetRef) {
        let ledger = MemoryLedger::new();
        let user = Uuid::new_v4();
        let target = TargetRef::new(TargetKind::Article, Uuid::new_v4());
        ledger.add_user(user).await;
        ledger.add_target(target).await;
        (ledger, user, target)
    }

    #[tokio::test]
    async fn test_commit_publishes_changes() {
        let (ledger, user, target) = seeded().await;
        let record = ReactionRecord::new(ReactionKey::new(user, target, ReactionKind::Like));

        let mut tx = ledger.begin().await.unwrap();
        tx.insert(&record).await.unwrap();
        tx.adjust(target, CounterField::LikeCount, CounterDelta::Increment)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(ledger.reaction_count().await, 1);
        assert_eq!(
            ledger.stored_counters(target).await,
            Some(ReactionTally::new(1, 0))
        );
        assert_eq!(
            ReactionQueryRepository::find_by_id(&ledger, record.id)
                .await
                .unwrap(),
            Some(record)
        );
    }

    #[tokio::test]
    async fn test_drop_discards_changes() {
        let (ledger, user, target) = seeded().await;
        let record = ReactionRecord::new(ReactionKey::new(user, target, ReactionKind::Like));

        {
            let mut tx = ledger.begin().await.unwrap();
            tx.insert(&record).await.unwrap();
            tx.adjust(target, CounterField::LikeCount, CounterDelta::Increment)
                .await
                .unwrap();
        }

        assert_eq!(ledger.reaction_count().await, 0);
        assert_eq!(ledger.stored_counters(target).await, Some(ReactionTally::default()));
    }

    #[tokio::test]
    async fn test_duplicate_key_and_unknown_user() {
        let (ledger, user, target) = seeded().await;
        let key = ReactionKey::new(user, target, ReactionKind::Favorite);

        let mut tx = ledger.begin().await.unwrap();
        tx.insert(&ReactionRecord::new(key)).await.unwrap();
        let err = tx.insert(&ReactionRecord::new(key)).await.unwrap_err();
        assert!(matches!(err, DomainError::ReactionAlreadyExists));

        let stranger = ReactionKey::new(Uuid::new_v4(), target, ReactionKind::Like);
        let err = tx.insert(&ReactionRecord::new(stranger)).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_kind_moves_natural_key() {
        let (ledger, user, target) = seeded().await;
        let key = ReactionKey::new(user, target, ReactionKind::Like);
        let record = ReactionRecord::new(key);

        let mut tx = ledger.begin().await.unwrap();
        tx.insert(&record).await.unwrap();
        let updated = tx.update_kind(record.id, ReactionKind::Favorite).await.unwrap();

        assert_eq!(updated.id, record.id);
        assert_eq!(updated.created_at, record.created_at);
        assert!(tx.find_existing(&key).await.unwrap().is_none());
        assert!(tx
            .find_existing(&key.with_kind(ReactionKind::Favorite))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_counter_faults() {
        let (ledger, _, target) = seeded().await;
        let missing = TargetRef::new(TargetKind::Event, Uuid::new_v4());

        let mut tx = ledger.begin().await.unwrap();
        let err = tx
            .adjust(missing, CounterField::LikeCount, CounterDelta::Increment)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound(t) if t == missing));

        ledger.fail_counter_updates(true);
        let err = tx
            .adjust(target, CounterField::LikeCount, CounterDelta::Increment)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CounterUpdateFailed(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_reaction() {
        let (ledger, _, _) = seeded().await;
        let mut tx = ledger.begin().await.unwrap();
        let err = tx.remove(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::ReactionNotFound(_)));
    }
}
