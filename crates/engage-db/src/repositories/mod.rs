//! Repository implementations
//!
//! PostgreSQL implementations of the ledger and query traits defined in engage-core.

pub(crate) mod error;
mod ledger;
mod query;

pub use ledger::{PgLedgerTransaction, PgReactionLedger};
pub use query::PgReactionQueryRepository;
