//! Business logic services
//!
//! The ledger service owns every write and keeps target counters in step with
//! the reaction rows; the query service serves read-only projections.

pub mod context;
pub mod error;
pub mod ledger;
pub mod query;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use ledger::{ReactionLedgerService, ReactionSelector};
pub use query::ReactionQueryService;
