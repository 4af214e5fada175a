//! Reaction targets and their denormalized counters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reaction::ReactionKind;

/// Kind of entity that can receive reactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Article,
    Business,
    Professional,
    Event,
}

impl TargetKind {
    /// Every target kind, in declaration order
    pub const ALL: [TargetKind; 4] = [
        TargetKind::Article,
        TargetKind::Business,
        TargetKind::Professional,
        TargetKind::Event,
    ];

    /// Wire and storage name
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Business => "business",
            Self::Professional => "professional",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "business" => Ok(Self::Business),
            "professional" => Ok(Self::Professional),
            "event" => Ok(Self::Event),
            _ => Err(ParseKindError::new("target kind", s)),
        }
    }
}

/// Error when parsing a target or reaction kind from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct ParseKindError {
    what: &'static str,
    value: String,
}

impl ParseKindError {
    pub(crate) fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

/// A concrete target row: kind discriminant plus row id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: Uuid,
}

impl TargetRef {
    pub const fn new(kind: TargetKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Counter column carried by every target row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    LikeCount,
    FavoriteCount,
}

impl CounterField {
    /// Column name on the target tables
    #[inline]
    pub const fn column(self) -> &'static str {
        match self {
            Self::LikeCount => "like_count",
            Self::FavoriteCount => "favorite_count",
        }
    }
}

impl From<ReactionKind> for CounterField {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => Self::LikeCount,
            ReactionKind::Favorite => Self::FavoriteCount,
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Unit adjustment applied to a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterDelta {
    Increment,
    Decrement,
}

impl CounterDelta {
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}

impl fmt::Display for CounterDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

/// Like/favorite counts for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionTally {
    pub like_count: i64,
    pub favorite_count: i64,
}

impl ReactionTally {
    pub const fn new(like_count: i64, favorite_count: i64) -> Self {
        Self {
            like_count,
            favorite_count,
        }
    }

    /// Value of a single counter
    pub const fn get(&self, field: CounterField) -> i64 {
        match field {
            CounterField::LikeCount => self.like_count,
            CounterField::FavoriteCount => self.favorite_count,
        }
    }

    /// Apply a delta, clamping at zero
    pub fn apply(&mut self, field: CounterField, delta: CounterDelta) {
        let slot = match field {
            CounterField::LikeCount => &mut self.like_count,
            CounterField::FavoriteCount => &mut self.favorite_count,
        };
        *slot = (*slot + i64::from(delta.value())).max(0);
    }
}

/// Stored counters compared against the live ledger count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterAudit {
    pub target: TargetRef,
    pub stored: ReactionTally,
    pub live: ReactionTally,
}

impl CounterAudit {
    pub fn in_sync(&self) -> bool {
        self.stored == self.live
    }
}
