//! Domain entities - core business objects

mod reaction;
mod target;

pub use reaction::{ReactionKey, ReactionKind, ReactionRecord, ToggleOutcome};
pub use target::{
    CounterAudit, CounterDelta, CounterField, ParseKindError, ReactionTally, TargetKind, TargetRef,
};
