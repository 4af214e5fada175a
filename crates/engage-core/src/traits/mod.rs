//! Storage traits (ports) for the reaction ledger

mod repositories;

pub use repositories::{
    LedgerTransaction, ReactionLedger, ReactionQueryRepository, ReactionStore, RepoResult,
    TargetCounterGateway,
};
