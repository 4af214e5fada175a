//! Reaction record - one user's like or favorite on one target

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::target::{CounterField, ParseKindError, TargetKind, TargetRef};

/// Engagement axis; a user may hold one of each per target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Favorite,
}

impl ReactionKind {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Favorite => "favorite",
        }
    }

    /// Counter on the target that tracks this kind
    #[inline]
    pub fn counter_field(self) -> CounterField {
        CounterField::from(self)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "favorite" => Ok(Self::Favorite),
            _ => Err(ParseKindError::new("reaction kind", s)),
        }
    }
}

/// Natural key of a reaction; unique across the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionKey {
    pub user_id: Uuid,
    pub target: TargetRef,
    pub kind: ReactionKind,
}

impl ReactionKey {
    pub const fn new(user_id: Uuid, target: TargetRef, kind: ReactionKind) -> Self {
        Self {
            user_id,
            target,
            kind,
        }
    }

    /// Same user and target, different reaction kind
    pub const fn with_kind(self, kind: ReactionKind) -> Self {
        Self { kind, ..self }
    }
}

impl fmt::Display for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.user_id, self.target, self.kind)
    }
}

/// Reaction entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_kind: TargetKind,
    pub target_id: Uuid,
    pub reaction_kind: ReactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReactionRecord {
    /// Create a new record for the given key with a fresh id
    pub fn new(key: ReactionKey) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: key.user_id,
            target_kind: key.target.kind,
            target_id: key.target.id,
            reaction_kind: key.kind,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn target(&self) -> TargetRef {
        TargetRef::new(self.target_kind, self.target_id)
    }

    #[inline]
    pub fn key(&self) -> ReactionKey {
        ReactionKey::new(self.user_id, self.target(), self.reaction_kind)
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Result of a toggle: which transition was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added(ReactionRecord),
    Removed,
}

impl ToggleOutcome {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::Removed => "removed",
        }
    }

    pub fn reaction(&self) -> Option<&ReactionRecord> {
        match self {
            Self::Added(record) => Some(record),
            Self::Removed => None,
        }
    }
}
