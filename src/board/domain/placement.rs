//! Card placement values produced by board mutations.

use super::{Card, CardId, Column, ColumnId, ColumnVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted location of a card: its column, position, and the completion
/// timestamp that follows from the column it sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlacement {
    /// Card being placed.
    pub card_id: CardId,
    /// Column the card now belongs to.
    pub column_id: ColumnId,
    /// Zero-based position inside the column.
    pub position: usize,
    /// Completion timestamp after the placement.
    pub completed_at: Option<DateTime<Utc>>,
}

impl CardPlacement {
    /// Captures the current placement of `card`.
    #[must_use]
    pub const fn of(card: &Card) -> Self {
        Self {
            card_id: card.id(),
            column_id: card.column_id(),
            position: card.position(),
            completed_at: card.completed_at(),
        }
    }
}

/// Compare-and-swap request for a column version.
///
/// Persistence applies the swap atomically with the placements of the same
/// mutation and rejects the whole batch when the stored version is not
/// `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnVersionClaim {
    /// Column whose version advances.
    pub column_id: ColumnId,
    /// Version the mutation was computed against.
    pub expected: ColumnVersion,
    /// Version after the mutation.
    pub next: ColumnVersion,
}

/// Column and position a card occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardSlot {
    /// Owning column.
    pub column_id: ColumnId,
    /// Zero-based position.
    pub position: usize,
}

/// Request to relocate one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCard {
    /// Card to move.
    pub card_id: CardId,
    /// Destination column.
    pub to_column_id: ColumnId,
    /// Requested position; clamped to the destination's valid range.
    pub to_position: usize,
    /// Version of the destination column the caller last saw, if tracked.
    pub expected_version: Option<ColumnVersion>,
}

impl MoveCard {
    /// Creates a move request without a version expectation.
    #[must_use]
    pub const fn new(card_id: CardId, to_column_id: ColumnId, to_position: usize) -> Self {
        Self {
            card_id,
            to_column_id,
            to_position,
            expected_version: None,
        }
    }

    /// Requires the destination column to still be at `version`.
    #[must_use]
    pub const fn expecting(mut self, version: ColumnVersion) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// Result of applying a [`MoveCard`] request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Card that was moved.
    pub card_id: CardId,
    /// Slot the card left.
    pub from: CardSlot,
    /// Slot the card now occupies.
    pub to: CardSlot,
    /// Every card whose placement changed: the moved card first, then the
    /// source column and the destination column in position order.
    pub placements: Vec<CardPlacement>,
    /// Version swaps for every touched column, source before destination.
    pub version_claims: Vec<ColumnVersionClaim>,
}

impl MoveOutcome {
    pub(super) const fn unchanged(card_id: CardId, slot: CardSlot) -> Self {
        Self {
            card_id,
            from: slot,
            to: slot,
            placements: Vec::new(),
            version_claims: Vec::new(),
        }
    }

    /// Returns whether the move left the board untouched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns whether the card changed columns.
    #[must_use]
    pub fn changed_column(&self) -> bool {
        self.from.column_id != self.to.column_id
    }
}

/// Result of removing a card from the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedCard {
    /// The card as it was before removal.
    pub card: Card,
    /// Cards that shifted to close the gap.
    pub placements: Vec<CardPlacement>,
    /// Version swap for the column the card left.
    pub version_claim: ColumnVersionClaim,
}

/// Columns rewritten by a column-level mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Remaining columns whose index changed, in index order.
    pub reindexed: Vec<Column>,
    /// Version swaps: the removed column first, if any, then every reindexed
    /// column.
    pub version_claims: Vec<ColumnVersionClaim>,
}

impl ColumnLayout {
    /// Returns whether the mutation left the column layout untouched.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.reindexed.is_empty() && self.version_claims.is_empty()
    }
}
