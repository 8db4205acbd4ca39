//! In-memory board repository for tests and single-process use.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{
        BoardSnapshot, Card, CardId, CardPlacement, Column, ColumnId, ColumnVersion,
        PersistedCardData, PersistedColumnData,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, BoardWrite},
};
use crate::tenant::TenantId;

/// Thread-safe in-memory board repository.
///
/// Besides storage it counts committed writes and can be told to fail the
/// next writes, which lets tests observe rollback behaviour.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    boards: HashMap<TenantId, TenantBoard>,
    committed_writes: usize,
    failing_writes: usize,
}

#[derive(Debug, Clone, Default)]
struct TenantBoard {
    columns: BTreeMap<ColumnId, Column>,
    cards: BTreeMap<CardId, Card>,
}

/// Error injected by [`InMemoryBoardRepository::fail_next_writes`].
#[derive(Debug, thiserror::Error)]
#[error("injected write failure")]
pub struct InjectedFailure;

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` writes fail with a persistence error without
    /// storing anything.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn fail_next_writes(&self, count: usize) -> BoardRepositoryResult<()> {
        self.write()?.failing_writes = count;
        Ok(())
    }

    /// Returns how many writes were committed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn committed_writes(&self) -> BoardRepositoryResult<usize> {
        Ok(self.read()?.committed_writes)
    }

    fn read(&self) -> BoardRepositoryResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> BoardRepositoryResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl TenantBoard {
    /// Applies every part of `write` in port order.
    fn apply(&mut self, write: &BoardWrite) -> BoardRepositoryResult<()> {
        for column in &write.columns {
            let version = self
                .columns
                .get(&column.id())
                .map_or(column.version(), Column::version);
            self.columns.insert(column.id(), versioned(column, version));
        }
        for claim in &write.claims {
            let column = self
                .columns
                .get_mut(&claim.column_id)
                .ok_or(BoardRepositoryError::ColumnNotFound(claim.column_id))?;
            if column.version() != claim.expected {
                return Err(BoardRepositoryError::StaleColumn {
                    column_id: claim.column_id,
                    expected: claim.expected,
                    stored: column.version(),
                });
            }
            *column = versioned(column, claim.next);
        }
        for card_id in &write.deleted_cards {
            self.cards
                .remove(card_id)
                .ok_or(BoardRepositoryError::CardNotFound(*card_id))?;
        }
        for column_id in &write.deleted_columns {
            if self.cards.values().any(|card| card.column_id() == *column_id) {
                return Err(BoardRepositoryError::ColumnInUse(*column_id));
            }
            self.columns
                .remove(column_id)
                .ok_or(BoardRepositoryError::ColumnNotFound(*column_id))?;
        }
        for card in &write.cards {
            if !self.columns.contains_key(&card.column_id()) {
                return Err(BoardRepositoryError::ColumnNotFound(card.column_id()));
            }
            self.cards.insert(card.id(), card.clone());
        }
        for placement in &write.placements {
            let card = self
                .cards
                .get_mut(&placement.card_id)
                .ok_or(BoardRepositoryError::CardNotFound(placement.card_id))?;
            *card = placed(card, *placement);
        }
        Ok(())
    }
}

/// Applies a placement to a stored card by rebuilding it from its parts.
fn placed(card: &Card, placement: CardPlacement) -> Card {
    Card::from_persisted(PersistedCardData {
        id: card.id(),
        column_id: placement.column_id,
        title: card.title().clone(),
        description: card.description().map(str::to_owned),
        priority: card.priority(),
        position: placement.position,
        due_at: card.due_at(),
        completed_at: placement.completed_at,
        created_at: card.created_at(),
    })
}

/// Returns a copy of `column` carrying `version`.
fn versioned(column: &Column, version: ColumnVersion) -> Column {
    Column::from_persisted(PersistedColumnData {
        id: column.id(),
        name: column.name().clone(),
        color: column.color().clone(),
        index: column.index(),
        wip_limit: column.wip_limit(),
        terminal: column.is_terminal(),
        version,
    })
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn load_board(&self, tenant_id: TenantId) -> BoardRepositoryResult<BoardSnapshot> {
        let state = self.read()?;
        let Some(board) = state.boards.get(&tenant_id) else {
            return Ok(BoardSnapshot::empty(tenant_id));
        };
        Ok(BoardSnapshot {
            tenant_id,
            columns: board.columns.values().cloned().collect(),
            cards: board.cards.values().cloned().collect(),
        })
    }

    async fn apply_write(
        &self,
        tenant_id: TenantId,
        write: &BoardWrite,
    ) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(BoardRepositoryError::persistence(InjectedFailure));
        }

        // Stage on a copy so a rejected write leaves the stored board as it was.
        let mut staged = state.boards.get(&tenant_id).cloned().unwrap_or_default();
        staged.apply(write)?;
        state.boards.insert(tenant_id, staged);
        state.committed_writes += 1;
        Ok(())
    }
}
