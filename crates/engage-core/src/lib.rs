//! # engage-core
//!
//! Domain layer for the engagement reaction ledger: reaction records, target
//! references, the error taxonomy, and the storage traits the ledger runs on.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    CounterAudit, CounterDelta, CounterField, ParseKindError, ReactionKey, ReactionKind,
    ReactionRecord, ReactionTally, TargetKind, TargetRef, ToggleOutcome,
};
pub use error::DomainError;
pub use traits::{
    LedgerTransaction, ReactionLedger, ReactionQueryRepository, ReactionStore, RepoResult,
    TargetCounterGateway,
};
