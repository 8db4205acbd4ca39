//! Repository port for board persistence.

use crate::board::domain::{
    BoardSnapshot, Card, CardId, CardPlacement, Column, ColumnId, ColumnVersion,
    ColumnVersionClaim,
};
use crate::tenant::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Every storage change one board mutation makes.
///
/// Repositories apply a write as a single unit: either every part lands or
/// nothing does. Parts are applied in this order:
///
/// 1. `columns` are upserted. Name, color, index, WIP limit and the terminal
///    flag are written; the version is only written when the column is new.
/// 2. `claims` compare-and-swap column versions.
/// 3. `deleted_cards` are removed.
/// 4. `deleted_columns` are removed; a column still holding stored cards is
///    rejected.
/// 5. `cards` are upserted.
/// 6. `placements` relocate stored cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardWrite {
    /// Columns to insert, or whose layout to update.
    pub columns: Vec<Column>,
    /// Column version swaps guarding the write.
    pub claims: Vec<ColumnVersionClaim>,
    /// Cards to delete.
    pub deleted_cards: Vec<CardId>,
    /// Columns to delete.
    pub deleted_columns: Vec<ColumnId>,
    /// Cards to insert or replace.
    pub cards: Vec<Card>,
    /// Card relocations.
    pub placements: Vec<CardPlacement>,
}

impl BoardWrite {
    /// Returns whether the write changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
            && self.claims.is_empty()
            && self.deleted_cards.is_empty()
            && self.deleted_columns.is_empty()
            && self.cards.is_empty()
            && self.placements.is_empty()
    }
}

/// Board persistence contract, keyed by tenant.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Loads every column and card of the tenant's board.
    ///
    /// Returns an empty snapshot for a tenant without a board.
    async fn load_board(&self, tenant_id: TenantId) -> BoardRepositoryResult<BoardSnapshot>;

    /// Applies `write` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::StaleColumn`] when a claim's expected
    /// version does not match the stored one,
    /// [`BoardRepositoryError::CardNotFound`] or
    /// [`BoardRepositoryError::ColumnNotFound`] when the write refers to
    /// something that is not stored, and
    /// [`BoardRepositoryError::ColumnInUse`] when a deleted column still
    /// holds cards. Nothing is written in any of these cases.
    async fn apply_write(&self, tenant_id: TenantId, write: &BoardWrite)
    -> BoardRepositoryResult<()>;

    /// Persists a batch of placements together with column version claims.
    ///
    /// # Errors
    ///
    /// See [`BoardRepository::apply_write`].
    async fn save_card_placements(
        &self,
        tenant_id: TenantId,
        placements: &[CardPlacement],
        claims: &[ColumnVersionClaim],
    ) -> BoardRepositoryResult<()> {
        let write = BoardWrite {
            claims: claims.to_vec(),
            placements: placements.to_vec(),
            ..BoardWrite::default()
        };
        self.apply_write(tenant_id, &write).await
    }

    /// Persists one placement without a version claim.
    ///
    /// # Errors
    ///
    /// See [`BoardRepository::apply_write`].
    async fn save_card_placement(
        &self,
        tenant_id: TenantId,
        placement: CardPlacement,
    ) -> BoardRepositoryResult<()> {
        self.save_card_placements(tenant_id, &[placement], &[])
            .await
    }

    /// Inserts a column or updates its layout, keeping any stored version.
    ///
    /// # Errors
    ///
    /// See [`BoardRepository::apply_write`].
    async fn save_column(&self, tenant_id: TenantId, column: &Column) -> BoardRepositoryResult<()> {
        let write = BoardWrite {
            columns: vec![column.clone()],
            ..BoardWrite::default()
        };
        self.apply_write(tenant_id, &write).await
    }

    /// Inserts or replaces a card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::ColumnNotFound`] when the card's
    /// column is not stored.
    async fn save_card(&self, tenant_id: TenantId, card: &Card) -> BoardRepositoryResult<()> {
        let write = BoardWrite {
            cards: vec![card.clone()],
            ..BoardWrite::default()
        };
        self.apply_write(tenant_id, &write).await
    }

    /// Deletes a card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::CardNotFound`] when no card is stored
    /// under `card_id`.
    async fn delete_card(&self, tenant_id: TenantId, card_id: CardId) -> BoardRepositoryResult<()> {
        let write = BoardWrite {
            deleted_cards: vec![card_id],
            ..BoardWrite::default()
        };
        self.apply_write(tenant_id, &write).await
    }

    /// Deletes an empty column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::ColumnNotFound`] when no column is
    /// stored under `column_id` and [`BoardRepositoryError::ColumnInUse`]
    /// while cards are stored in it.
    async fn delete_column(
        &self,
        tenant_id: TenantId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<()> {
        let write = BoardWrite {
            deleted_columns: vec![column_id],
            ..BoardWrite::default()
        };
        self.apply_write(tenant_id, &write).await
    }
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// A version claim did not match the stored column version.
    #[error("column {column_id} is stale: expected {expected}, stored {stored}")]
    StaleColumn {
        /// Column whose version moved on.
        column_id: ColumnId,
        /// Version the claim expected.
        expected: ColumnVersion,
        /// Version currently stored.
        stored: ColumnVersion,
    },

    /// The column is not stored.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The card is not stored.
    #[error("card not found: {0}")]
    CardNotFound(CardId),

    /// A column cannot be deleted while cards are stored in it.
    #[error("column {0} still holds cards")]
    ColumnInUse(ColumnId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
