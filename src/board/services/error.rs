//! Service-level errors for board operations.

use crate::board::{domain::BoardDomainError, ports::BoardRepositoryError};
use thiserror::Error;

/// Service-level errors for board store operations.
#[derive(Debug, Error)]
pub enum BoardStoreError {
    /// Domain validation or a board rule failed; the board is unchanged.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Repository operation failed; the board was rolled back.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),
}

/// Result type for board store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardErrorKind {
    /// A card or column identifier does not resolve.
    NotFound,
    /// The target column is full.
    WipLimitExceeded,
    /// The board changed underneath the caller; reload and retry.
    Conflict,
    /// Storage failed.
    Persistence,
    /// The input did not pass validation.
    Invalid,
}

impl BoardStoreError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::Domain(
                BoardDomainError::CardNotFound(_) | BoardDomainError::ColumnNotFound(_),
            )
            | Self::Repository(
                BoardRepositoryError::CardNotFound(_) | BoardRepositoryError::ColumnNotFound(_),
            ) => BoardErrorKind::NotFound,
            Self::Domain(BoardDomainError::WipLimitExceeded { .. }) => {
                BoardErrorKind::WipLimitExceeded
            }
            Self::Domain(BoardDomainError::VersionConflict { .. })
            | Self::Repository(
                BoardRepositoryError::StaleColumn { .. } | BoardRepositoryError::ColumnInUse(_),
            ) => BoardErrorKind::Conflict,
            Self::Repository(BoardRepositoryError::Persistence(_)) => BoardErrorKind::Persistence,
            Self::Domain(_) => BoardErrorKind::Invalid,
        }
    }

    /// Returns a short message suitable for showing to an end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(BoardDomainError::WipLimitExceeded { limit, .. }) => {
                format!("WIP limit reached ({limit})")
            }
            Self::Domain(BoardDomainError::CardNotFound(_))
            | Self::Repository(BoardRepositoryError::CardNotFound(_)) => {
                "Card not found".to_owned()
            }
            Self::Domain(BoardDomainError::ColumnNotFound(_))
            | Self::Repository(BoardRepositoryError::ColumnNotFound(_)) => {
                "Column not found".to_owned()
            }
            Self::Domain(BoardDomainError::ColumnNotEmpty { card_count, .. }) => {
                format!("Move or remove the {card_count} cards in this column first")
            }
            Self::Domain(BoardDomainError::VersionConflict { .. })
            | Self::Repository(
                BoardRepositoryError::StaleColumn { .. } | BoardRepositoryError::ColumnInUse(_),
            ) => {
                "The board changed in another session; reload and try again".to_owned()
            }
            Self::Repository(BoardRepositoryError::Persistence(_)) => {
                "Could not save the board; your change was undone".to_owned()
            }
            Self::Domain(other) => other.to_string(),
        }
    }
}
