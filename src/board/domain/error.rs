//! Error types for board domain validation and card placement rules.

use super::{CardId, ColumnId, ColumnVersion, WipLimit};
use thiserror::Error;

/// Errors returned while building board values or applying board mutations.
///
/// Every rule violation is detected before the board is mutated, so a board
/// that returns one of these errors is left exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The column name is empty after trimming.
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// The column name exceeds the storage limit.
    #[error("column name exceeds 100 character limit: {0}")]
    ColumnNameTooLong(String),

    /// The column color is not a `#RRGGBB` hex triplet.
    #[error("invalid column color '{0}', expected #RRGGBB")]
    InvalidColumnColor(String),

    /// The WIP limit is zero.
    #[error("invalid WIP limit {0}, expected a positive integer")]
    InvalidWipLimit(u32),

    /// The card title is empty after trimming.
    #[error("card title must not be empty")]
    EmptyCardTitle,

    /// The priority value is not recognized.
    #[error("unknown card priority: {0}")]
    UnknownPriority(String),

    /// No column has the given identifier.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// No card has the given identifier.
    #[error("card not found: {0}")]
    CardNotFound(CardId),

    /// The target column already holds as many cards as its WIP limit.
    #[error("WIP limit reached ({limit}) in column {column_id}")]
    WipLimitExceeded {
        /// Column that rejected the card.
        column_id: ColumnId,
        /// Configured limit.
        limit: WipLimit,
    },

    /// The caller's view of a column is older than the board's.
    #[error("column {column_id} changed: expected {expected}, found {actual}")]
    VersionConflict {
        /// Column whose version differs.
        column_id: ColumnId,
        /// Version the caller expected.
        expected: ColumnVersion,
        /// Version held by the board.
        actual: ColumnVersion,
    },

    /// A column cannot be removed while it still holds cards.
    #[error("column {column_id} still holds {card_count} cards")]
    ColumnNotEmpty {
        /// Column that was asked to be removed.
        column_id: ColumnId,
        /// Number of cards still assigned to it.
        card_count: usize,
    },

    /// A loaded card references a column that does not exist.
    #[error("card {card_id} references missing column {column_id}")]
    OrphanCard {
        /// Offending card.
        card_id: CardId,
        /// Column it points at.
        column_id: ColumnId,
    },

    /// A loaded snapshot contains the same column twice.
    #[error("duplicate column identifier: {0}")]
    DuplicateColumn(ColumnId),

    /// A loaded snapshot contains the same card twice.
    #[error("duplicate card identifier: {0}")]
    DuplicateCard(CardId),
}
