//! Board store: the caller-owned, authoritative view of one tenant's board.

use super::{BoardStoreError, BoardStoreResult};
use crate::board::{
    domain::{
        Board, BoardChange, BoardDomainError, Card, CardId, CardPriority, CardSlot, CardTitle,
        Column, ColumnColor, ColumnId, ColumnName, ColumnStats, LoadedBoard, MoveCard,
        MoveOutcome, WipLimit,
    },
    ports::{BoardObserver, BoardRepository, BoardRepositoryResult, BoardWrite},
};
use crate::config::{BoardConfig, ConcurrencyMode};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for adding a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumnRequest {
    name: String,
    color: Option<String>,
    wip_limit: Option<u32>,
    terminal: bool,
}

impl AddColumnRequest {
    /// Creates a request with the required column name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            wip_limit: None,
            terminal: false,
        }
    }

    /// Sets the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the WIP limit.
    #[must_use]
    pub const fn with_wip_limit(mut self, limit: u32) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    /// Marks the column as terminal.
    #[must_use]
    pub const fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    fn into_column(self) -> Result<Column, BoardDomainError> {
        let name = ColumnName::new(self.name)?;
        let color = self
            .color
            .map(ColumnColor::new)
            .transpose()?
            .unwrap_or_default();
        let mut column = Column::new(name, color);
        if let Some(limit) = self.wip_limit {
            column = column.with_wip_limit(WipLimit::new(limit)?);
        }
        if self.terminal {
            column = column.terminal();
        }
        Ok(column)
    }
}

/// Request payload for adding a card at the end of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCardRequest {
    column_id: ColumnId,
    title: String,
    priority: CardPriority,
    description: Option<String>,
    due_at: Option<DateTime<Utc>>,
}

impl AddCardRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(column_id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            column_id,
            title: title.into(),
            priority: CardPriority::default(),
            description: None,
            due_at: None,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: CardPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due timestamp.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    fn into_card(self, clock: &impl Clock) -> Result<Card, BoardDomainError> {
        let title = CardTitle::new(self.title)?;
        let mut card = Card::new(self.column_id, title, self.priority, clock);
        if let Some(description) = self.description {
            card = card.with_description(description);
        }
        if let Some(due_at) = self.due_at {
            card = card.with_due_at(due_at);
        }
        Ok(card)
    }
}

/// Handle returned by [`BoardStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Authoritative in-memory board for one tenant.
///
/// The store is the only writer of card placements. Mutations validate
/// first, apply optimistically, persist every change in one atomic write,
/// and restore the previous board if that write fails. Observers hear about a mutation once, after it has
/// been persisted.
pub struct BoardStore<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    tenant_id: TenantId,
    repository: Arc<R>,
    clock: Arc<C>,
    config: BoardConfig,
    board: Board,
    observers: Vec<(SubscriptionId, Arc<dyn BoardObserver>)>,
    next_subscription: u64,
}

impl<R, C> BoardStore<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Loads the tenant's board and returns a store holding it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when loading fails or the stored board is
    /// inconsistent.
    pub async fn load(
        tenant_id: TenantId,
        repository: Arc<R>,
        clock: Arc<C>,
        config: BoardConfig,
    ) -> BoardStoreResult<Self> {
        let board = fetch_board(&*repository, tenant_id, &config).await?;
        Ok(Self {
            tenant_id,
            repository,
            clock,
            config,
            board,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Replaces the whole board with the persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError`] when loading fails; the current board is
    /// kept in that case.
    pub async fn reload(&mut self) -> BoardStoreResult<()> {
        self.board = fetch_board(&*self.repository, self.tenant_id, &self.config).await?;
        if self.config.notify_on_reload {
            self.notify(&BoardChange::Reloaded {
                tenant_id: self.tenant_id,
            });
        }
        Ok(())
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns columns ordered by index.
    #[must_use]
    pub fn list_columns(&self) -> &[Column] {
        self.board.columns()
    }

    /// Returns the cards of a column ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] for an unknown column.
    pub fn list_cards(&self, column_id: ColumnId) -> BoardStoreResult<&[Card]> {
        self.board
            .cards_in(column_id)
            .ok_or(BoardStoreError::Domain(BoardDomainError::ColumnNotFound(
                column_id,
            )))
    }

    /// Returns the card with `card_id`, if any.
    #[must_use]
    pub fn find_card(&self, card_id: CardId) -> Option<&Card> {
        self.board.card(card_id)
    }

    /// Returns the total number of cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.board.card_count()
    }

    /// Computes statistics for every column at the current clock time.
    #[must_use]
    pub fn stats(&self) -> Vec<ColumnStats> {
        self.board.column_stats(self.clock.utc())
    }

    /// Registers an observer and returns its subscription handle.
    pub fn subscribe(&mut self, observer: Arc<dyn BoardObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.observers.push((id, observer));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    /// Moves a card to a column and position.
    ///
    /// Moving a card onto its current slot is a no-op: nothing is persisted
    /// and nobody is notified.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] for unknown identifiers, full
    /// columns or a stale expected version, leaving the board untouched, and
    /// [`BoardStoreError::Repository`] when persistence fails, after rolling
    /// the board back.
    pub async fn apply_move(&mut self, request: MoveCard) -> BoardStoreResult<MoveOutcome> {
        let snapshot = self.board.clone();
        let outcome = self.board.apply_move(&request, self.clock.utc())?;
        if outcome.is_noop() {
            debug!(
                tenant_id = %self.tenant_id,
                card_id = %request.card_id,
                "card move is a no-op"
            );
            return Ok(outcome);
        }

        let write = BoardWrite {
            claims: outcome.version_claims.clone(),
            placements: outcome.placements.clone(),
            ..BoardWrite::default()
        };
        if let Err(err) = self.persist(write).await {
            self.board = snapshot;
            warn!(
                tenant_id = %self.tenant_id,
                card_id = %request.card_id,
                error = %err,
                "card move rolled back"
            );
            return Err(err.into());
        }

        info!(
            tenant_id = %self.tenant_id,
            card_id = %outcome.card_id,
            from_column = %outcome.from.column_id,
            to_column = %outcome.to.column_id,
            to_position = outcome.to.position,
            changed = outcome.placements.len(),
            "card moved"
        );
        self.notify(&BoardChange::CardMoved {
            card_id: outcome.card_id,
            from: outcome.from,
            to: outcome.to,
        });
        Ok(outcome)
    }

    /// Appends a new column to the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] when validation fails and
    /// [`BoardStoreError::Repository`] when persistence fails.
    pub async fn add_column(&mut self, request: AddColumnRequest) -> BoardStoreResult<Column> {
        let column = request.into_column()?;
        let snapshot = self.board.clone();
        let column = self.board.add_column(column)?;

        let write = BoardWrite {
            columns: vec![column.clone()],
            ..BoardWrite::default()
        };
        if let Err(err) = self.persist(write).await {
            self.board = snapshot;
            warn!(tenant_id = %self.tenant_id, error = %err, "column creation rolled back");
            return Err(err.into());
        }

        info!(tenant_id = %self.tenant_id, column_id = %column.id(), "column added");
        self.notify(&BoardChange::ColumnAdded {
            column_id: column.id(),
        });
        Ok(column)
    }

    /// Removes an empty column and reindexes the rest.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotEmpty`] while the column still
    /// holds cards, and repository errors after rolling back.
    pub async fn remove_column(&mut self, column_id: ColumnId) -> BoardStoreResult<()> {
        let snapshot = self.board.clone();
        let layout = self.board.remove_column(column_id)?;

        let write = BoardWrite {
            columns: layout.reindexed,
            claims: layout.version_claims,
            deleted_columns: vec![column_id],
            ..BoardWrite::default()
        };
        if let Err(err) = self.persist(write).await {
            self.board = snapshot;
            warn!(tenant_id = %self.tenant_id, %column_id, error = %err, "column removal rolled back");
            return Err(err.into());
        }

        info!(tenant_id = %self.tenant_id, %column_id, "column removed");
        self.notify(&BoardChange::ColumnRemoved { column_id });
        Ok(())
    }

    /// Moves a column to a new index, clamped to the last index.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] for an unknown column and
    /// repository errors after rolling back.
    pub async fn move_column(&mut self, column_id: ColumnId, to_index: usize) -> BoardStoreResult<()> {
        let snapshot = self.board.clone();
        let layout = self.board.move_column(column_id, to_index)?;
        if layout.is_unchanged() {
            return Ok(());
        }

        let write = BoardWrite {
            columns: layout.reindexed,
            claims: layout.version_claims,
            ..BoardWrite::default()
        };
        if let Err(err) = self.persist(write).await {
            self.board = snapshot;
            warn!(tenant_id = %self.tenant_id, %column_id, error = %err, "column reorder rolled back");
            return Err(err.into());
        }

        info!(tenant_id = %self.tenant_id, %column_id, to_index, "columns reordered");
        let order = self.board.columns().iter().map(Column::id).collect();
        self.notify(&BoardChange::ColumnsReordered { order });
        Ok(())
    }

    /// Adds a card at the end of its column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] for invalid input, an unknown
    /// column or a full column, and repository errors after rolling back.
    pub async fn add_card(&mut self, request: AddCardRequest) -> BoardStoreResult<Card> {
        let card = request.into_card(&*self.clock)?;
        let snapshot = self.board.clone();
        let (card, claim) = self.board.add_card(card, self.clock.utc())?;

        let write = BoardWrite {
            cards: vec![card.clone()],
            claims: vec![claim],
            ..BoardWrite::default()
        };
        if let Err(err) = self.persist(write).await {
            self.board = snapshot;
            warn!(tenant_id = %self.tenant_id, error = %err, "card creation rolled back");
            return Err(err.into());
        }

        info!(tenant_id = %self.tenant_id, card_id = %card.id(), column_id = %card.column_id(), "card added");
        self.notify(&BoardChange::CardAdded {
            card_id: card.id(),
            slot: CardSlot {
                column_id: card.column_id(),
                position: card.position(),
            },
        });
        Ok(card)
    }

    /// Removes a card and closes the gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::CardNotFound`] for an unknown card and
    /// repository errors after rolling back.
    pub async fn remove_card(&mut self, card_id: CardId) -> BoardStoreResult<Card> {
        let snapshot = self.board.clone();
        let removed = self.board.remove_card(card_id)?;

        let write = BoardWrite {
            claims: vec![removed.version_claim],
            deleted_cards: vec![card_id],
            placements: removed.placements.clone(),
            ..BoardWrite::default()
        };
        if let Err(err) = self.persist(write).await {
            self.board = snapshot;
            warn!(tenant_id = %self.tenant_id, %card_id, error = %err, "card removal rolled back");
            return Err(err.into());
        }

        info!(tenant_id = %self.tenant_id, %card_id, "card removed");
        self.notify(&BoardChange::CardRemoved {
            card_id,
            slot: CardSlot {
                column_id: removed.card.column_id(),
                position: removed.card.position(),
            },
        });
        Ok(removed.card)
    }

    /// Sends one mutation's changes to the repository as a single write.
    ///
    /// Version claims are dropped under [`ConcurrencyMode::LastWriteWins`].
    async fn persist(&self, mut write: BoardWrite) -> BoardRepositoryResult<()> {
        if self.config.concurrency == ConcurrencyMode::LastWriteWins {
            write.claims.clear();
        }
        if write.is_empty() {
            return Ok(());
        }
        self.repository.apply_write(self.tenant_id, &write).await
    }

    fn notify(&self, change: &BoardChange) {
        for (_, observer) in &self.observers {
            observer.board_changed(change);
        }
    }
}

async fn fetch_board<R>(
    repository: &R,
    tenant_id: TenantId,
    config: &BoardConfig,
) -> BoardStoreResult<Board>
where
    R: BoardRepository,
{
    let snapshot = repository.load_board(tenant_id).await?;
    let LoadedBoard {
        board,
        repairs,
        reindexed_columns,
    } = Board::from_snapshot(snapshot)?;

    if repairs.is_empty() && reindexed_columns.is_empty() {
        debug!(%tenant_id, cards = board.card_count(), "board loaded");
        return Ok(board);
    }

    warn!(
        %tenant_id,
        repaired_cards = repairs.len(),
        reindexed_columns = reindexed_columns.len(),
        "stored board ordering was not dense"
    );
    if config.persist_load_repairs {
        let write = BoardWrite {
            columns: reindexed_columns
                .iter()
                .filter_map(|column_id| board.column(*column_id).cloned())
                .collect(),
            placements: repairs,
            ..BoardWrite::default()
        };
        repository.apply_write(tenant_id, &write).await?;
    }
    Ok(board)
}
