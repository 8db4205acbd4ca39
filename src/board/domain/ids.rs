//! Identifier and validated scalar types for the board domain.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a board column.
    ColumnId
);

uuid_id!(
    /// Unique identifier for a board card.
    CardId
);

/// Monotonic per-column version used to detect stale moves.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ColumnVersion(u64);

impl ColumnVersion {
    /// Version assigned to freshly created columns.
    pub const INITIAL: Self = Self(0);

    /// Wraps a persisted version number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw version number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the version that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ColumnVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Maximum number of cards a column may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WipLimit(u32);

impl WipLimit {
    /// Creates a validated WIP limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidWipLimit`] when the limit is zero.
    pub const fn new(value: u32) -> Result<Self, BoardDomainError> {
        if value == 0 {
            return Err(BoardDomainError::InvalidWipLimit(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw limit.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns whether a column holding `count` cards has no room left.
    #[must_use]
    pub fn is_reached_by(self, count: usize) -> bool {
        usize::try_from(self.0).is_ok_and(|limit| count >= limit)
    }
}

impl TryFrom<u32> for WipLimit {
    type Error = BoardDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WipLimit> for u32 {
    fn from(limit: WipLimit) -> Self {
        limit.0
    }
}

impl fmt::Display for WipLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
