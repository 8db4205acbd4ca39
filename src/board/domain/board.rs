//! Board aggregate: ordered columns, per-column card lanes, and the rules
//! that keep card positions dense.

use super::{
    BoardDomainError, Card, CardId, CardPlacement, CardSlot, Column, ColumnId, ColumnLayout,
    ColumnStats, ColumnVersionClaim, MoveCard, MoveOutcome, RemovedCard,
};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Raw board contents as returned by persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Tenant owning the board.
    pub tenant_id: TenantId,
    /// Columns in any order.
    pub columns: Vec<Column>,
    /// Cards in any order.
    pub cards: Vec<Card>,
}

impl BoardSnapshot {
    /// Creates an empty snapshot for `tenant_id`.
    #[must_use]
    pub const fn empty(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            columns: Vec::new(),
            cards: Vec::new(),
        }
    }
}

/// A normalized board plus the placements that normalization rewrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBoard {
    /// Board with dense column indices and card positions.
    pub board: Board,
    /// Cards whose stored position was not dense.
    pub repairs: Vec<CardPlacement>,
    /// Columns whose stored index was not dense.
    pub reindexed_columns: Vec<ColumnId>,
}

/// In-memory view of one tenant's board.
///
/// Columns are kept in index order and every column owns a lane of cards in
/// position order, so the vector offset of each entry is its index. Lanes are
/// keyed by an ordered map; nothing here depends on hash iteration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tenant_id: TenantId,
    columns: Vec<Column>,
    lanes: BTreeMap<ColumnId, Vec<Card>>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub const fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            columns: Vec::new(),
            lanes: BTreeMap::new(),
        }
    }

    /// Builds a board from a persisted snapshot.
    ///
    /// Columns are ordered by (index, id) and cards by (position, id), then
    /// renumbered densely. Entries whose stored ordering changed are
    /// reported so callers can write them back.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateColumn`],
    /// [`BoardDomainError::DuplicateCard`] or [`BoardDomainError::OrphanCard`]
    /// when the snapshot cannot describe a consistent board.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Result<LoadedBoard, BoardDomainError> {
        let BoardSnapshot {
            tenant_id,
            mut columns,
            cards,
        } = snapshot;

        columns.sort_by(|left, right| {
            left.index()
                .cmp(&right.index())
                .then_with(|| left.id().cmp(&right.id()))
        });

        let mut lanes: BTreeMap<ColumnId, Vec<Card>> = BTreeMap::new();
        let mut reindexed_columns = Vec::new();
        for (index, column) in columns.iter_mut().enumerate() {
            if lanes.insert(column.id(), Vec::new()).is_some() {
                return Err(BoardDomainError::DuplicateColumn(column.id()));
            }
            if column.index() != index {
                column.set_index(index);
                reindexed_columns.push(column.id());
            }
        }

        let mut seen_cards = BTreeSet::new();
        for card in cards {
            if !seen_cards.insert(card.id()) {
                return Err(BoardDomainError::DuplicateCard(card.id()));
            }
            let lane = lanes
                .get_mut(&card.column_id())
                .ok_or(BoardDomainError::OrphanCard {
                    card_id: card.id(),
                    column_id: card.column_id(),
                })?;
            lane.push(card);
        }

        let mut repairs = Vec::new();
        for column in &columns {
            if let Some(lane) = lanes.get_mut(&column.id()) {
                lane.sort_by(|left, right| {
                    left.position()
                        .cmp(&right.position())
                        .then_with(|| left.id().cmp(&right.id()))
                });
                renumber(lane, 0, None, &mut repairs);
            }
        }

        Ok(LoadedBoard {
            board: Self {
                tenant_id,
                columns,
                lanes,
            },
            repairs,
            reindexed_columns,
        })
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns columns ordered by index.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column with `column_id`, if any.
    #[must_use]
    pub fn column(&self, column_id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == column_id)
    }

    /// Returns the cards of `column_id` ordered by position.
    #[must_use]
    pub fn cards_in(&self, column_id: ColumnId) -> Option<&[Card]> {
        self.lanes.get(&column_id).map(Vec::as_slice)
    }

    /// Returns the card with `card_id`, if any.
    #[must_use]
    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.lanes
            .values()
            .flat_map(|lane| lane.iter())
            .find(|card| card.id() == card_id)
    }

    /// Returns the slot currently occupied by `card_id`.
    #[must_use]
    pub fn locate(&self, card_id: CardId) -> Option<CardSlot> {
        self.card(card_id).map(|card| CardSlot {
            column_id: card.column_id(),
            position: card.position(),
        })
    }

    /// Returns the total number of cards on the board.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.lanes.values().map(Vec::len).sum()
    }

    /// Computes per-column statistics at `now`, in column order.
    #[must_use]
    pub fn column_stats(&self, now: DateTime<Utc>) -> Vec<ColumnStats> {
        self.columns
            .iter()
            .map(|column| {
                let cards = self.cards_in(column.id()).unwrap_or_default();
                ColumnStats::for_cards(column.id(), cards, now)
            })
            .collect()
    }

    /// Appends `column` after the existing columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateColumn`] when the identifier is
    /// already on the board.
    pub fn add_column(&mut self, mut column: Column) -> Result<Column, BoardDomainError> {
        if self.lanes.contains_key(&column.id()) {
            return Err(BoardDomainError::DuplicateColumn(column.id()));
        }
        column.set_index(self.columns.len());
        self.lanes.insert(column.id(), Vec::new());
        self.columns.push(column.clone());
        Ok(column)
    }

    /// Removes an empty column and closes the index gap.
    ///
    /// The removed column and every remaining column whose index changed get
    /// a version swap, so the removal conflicts with any concurrent change to
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] for an unknown column or
    /// [`BoardDomainError::ColumnNotEmpty`] while it still holds cards.
    pub fn remove_column(&mut self, column_id: ColumnId) -> Result<ColumnLayout, BoardDomainError> {
        let offset = self.column_offset(column_id)?;
        let card_count = self.lanes.get(&column_id).map_or(0, Vec::len);
        if card_count > 0 {
            return Err(BoardDomainError::ColumnNotEmpty {
                column_id,
                card_count,
            });
        }
        let removed = self.columns.remove(offset);
        self.lanes.remove(&column_id);
        let mut layout = self.reindex_columns()?;
        layout.version_claims.insert(
            0,
            ColumnVersionClaim {
                column_id,
                expected: removed.version(),
                next: removed.version().next(),
            },
        );
        Ok(layout)
    }

    /// Moves a column to `to_index`, clamped to the last index.
    ///
    /// Every column whose index changed gets a version swap. Moving a column
    /// onto its own index returns an unchanged layout.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] for an unknown column.
    pub fn move_column(
        &mut self,
        column_id: ColumnId,
        to_index: usize,
    ) -> Result<ColumnLayout, BoardDomainError> {
        let offset = self.column_offset(column_id)?;
        let target = to_index.min(self.columns.len().saturating_sub(1));
        if target == offset {
            return Ok(ColumnLayout::default());
        }
        let column = self.columns.remove(offset);
        self.columns.insert(target, column);
        self.reindex_columns()
    }

    /// Appends `card` to the end of its column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] for an unknown column,
    /// [`BoardDomainError::DuplicateCard`] for a known card identifier, or
    /// [`BoardDomainError::WipLimitExceeded`] when the column is full.
    pub fn add_card(
        &mut self,
        mut card: Card,
        now: DateTime<Utc>,
    ) -> Result<(Card, ColumnVersionClaim), BoardDomainError> {
        let column_id = card.column_id();
        let column = self
            .column(column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))?;
        let terminal = column.is_terminal();
        let limit = column.wip_limit();
        if self.card(card.id()).is_some() {
            return Err(BoardDomainError::DuplicateCard(card.id()));
        }
        let lane = self
            .lanes
            .get_mut(&column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))?;
        if let Some(limit) = limit.filter(|limit| limit.is_reached_by(lane.len())) {
            return Err(BoardDomainError::WipLimitExceeded { column_id, limit });
        }

        card.relocate(column_id, terminal, now);
        card.set_position(lane.len());
        lane.push(card.clone());
        let claim = self.bump_version(column_id)?;
        Ok((card, claim))
    }

    /// Removes a card and closes the position gap behind it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::CardNotFound`] for an unknown card.
    pub fn remove_card(&mut self, card_id: CardId) -> Result<RemovedCard, BoardDomainError> {
        let slot = self
            .locate(card_id)
            .ok_or(BoardDomainError::CardNotFound(card_id))?;
        let lane = self
            .lanes
            .get_mut(&slot.column_id)
            .ok_or(BoardDomainError::CardNotFound(card_id))?;
        let card = lane.remove(slot.position);
        let mut placements = Vec::new();
        renumber(lane, slot.position, None, &mut placements);
        let version_claim = self.bump_version(slot.column_id)?;
        Ok(RemovedCard {
            card,
            placements,
            version_claim,
        })
    }

    /// Relocates a card, keeping every lane dense.
    ///
    /// The requested position is clamped to `count` for a cross-column move
    /// and to `count - 1` for a reorder within the same column. WIP limits
    /// only apply when the card changes columns. Moving a card onto its own
    /// slot returns a no-op outcome and touches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::CardNotFound`],
    /// [`BoardDomainError::ColumnNotFound`],
    /// [`BoardDomainError::VersionConflict`] or
    /// [`BoardDomainError::WipLimitExceeded`]; all are detected before any
    /// state changes.
    pub fn apply_move(
        &mut self,
        request: &MoveCard,
        now: DateTime<Utc>,
    ) -> Result<MoveOutcome, BoardDomainError> {
        let from = self
            .locate(request.card_id)
            .ok_or(BoardDomainError::CardNotFound(request.card_id))?;
        let to_column_id = request.to_column_id;
        let target = self
            .column(to_column_id)
            .ok_or(BoardDomainError::ColumnNotFound(to_column_id))?;
        if let Some(expected) = request.expected_version {
            if expected != target.version() {
                return Err(BoardDomainError::VersionConflict {
                    column_id: to_column_id,
                    expected,
                    actual: target.version(),
                });
            }
        }
        let terminal = target.is_terminal();
        let limit = target.wip_limit();
        let target_count = self.lanes.get(&to_column_id).map_or(0, Vec::len);

        if from.column_id == to_column_id {
            let to_position = request.to_position.min(target_count.saturating_sub(1));
            if to_position == from.position {
                return Ok(MoveOutcome::unchanged(request.card_id, from));
            }
            return self.reorder_within(request.card_id, from, to_position);
        }

        if let Some(limit) = limit.filter(|limit| limit.is_reached_by(target_count)) {
            return Err(BoardDomainError::WipLimitExceeded {
                column_id: to_column_id,
                limit,
            });
        }
        let to_position = request.to_position.min(target_count);
        self.transfer(
            request.card_id,
            from,
            CardSlot {
                column_id: to_column_id,
                position: to_position,
            },
            terminal,
            now,
        )
    }

    fn reorder_within(
        &mut self,
        card_id: CardId,
        from: CardSlot,
        to_position: usize,
    ) -> Result<MoveOutcome, BoardDomainError> {
        let lane = self
            .lanes
            .get_mut(&from.column_id)
            .ok_or(BoardDomainError::ColumnNotFound(from.column_id))?;
        let card = lane.remove(from.position);
        lane.insert(to_position, card);

        let mut placements = Vec::new();
        renumber(
            lane,
            from.position.min(to_position),
            Some(card_id),
            &mut placements,
        );
        if let Some(moved) = lane.get(to_position) {
            placements.insert(0, CardPlacement::of(moved));
        }

        let claim = self.bump_version(from.column_id)?;
        Ok(MoveOutcome {
            card_id,
            from,
            to: CardSlot {
                column_id: from.column_id,
                position: to_position,
            },
            placements,
            version_claims: vec![claim],
        })
    }

    fn transfer(
        &mut self,
        card_id: CardId,
        from: CardSlot,
        to: CardSlot,
        terminal: bool,
        now: DateTime<Utc>,
    ) -> Result<MoveOutcome, BoardDomainError> {
        // Detach the destination lane so both lanes can be borrowed at once
        // and a missing source lane cannot leave a half-applied move.
        let mut target_lane = self
            .lanes
            .remove(&to.column_id)
            .ok_or(BoardDomainError::ColumnNotFound(to.column_id))?;
        let Some(source_lane) = self.lanes.get_mut(&from.column_id) else {
            self.lanes.insert(to.column_id, target_lane);
            return Err(BoardDomainError::ColumnNotFound(from.column_id));
        };

        let mut card = source_lane.remove(from.position);
        let mut placements = Vec::new();
        renumber(source_lane, from.position, None, &mut placements);

        card.relocate(to.column_id, terminal, now);
        card.set_position(to.position);
        placements.insert(0, CardPlacement::of(&card));
        target_lane.insert(to.position, card);
        renumber(&mut target_lane, to.position, Some(card_id), &mut placements);
        self.lanes.insert(to.column_id, target_lane);

        let source_claim = self.bump_version(from.column_id)?;
        let target_claim = self.bump_version(to.column_id)?;
        Ok(MoveOutcome {
            card_id,
            from,
            to,
            placements,
            version_claims: vec![source_claim, target_claim],
        })
    }

    fn column_offset(&self, column_id: ColumnId) -> Result<usize, BoardDomainError> {
        self.columns
            .iter()
            .position(|column| column.id() == column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))
    }

    fn bump_version(&mut self, column_id: ColumnId) -> Result<ColumnVersionClaim, BoardDomainError> {
        let column = self
            .columns
            .iter_mut()
            .find(|column| column.id() == column_id)
            .ok_or(BoardDomainError::ColumnNotFound(column_id))?;
        let expected = column.version();
        column.bump_version();
        Ok(ColumnVersionClaim {
            column_id,
            expected,
            next: column.version(),
        })
    }

    fn reindex_columns(&mut self) -> Result<ColumnLayout, BoardDomainError> {
        let mut moved = Vec::new();
        for (index, column) in self.columns.iter_mut().enumerate() {
            if column.index() != index {
                column.set_index(index);
                moved.push(column.id());
            }
        }

        let mut layout = ColumnLayout::default();
        for column_id in moved {
            layout.version_claims.push(self.bump_version(column_id)?);
            if let Some(column) = self.column(column_id) {
                layout.reindexed.push(column.clone());
            }
        }
        Ok(layout)
    }
}

/// Rewrites positions from `start` onwards to match vector offsets and
/// records every card whose position changed, except `skip`.
fn renumber(
    lane: &mut [Card],
    start: usize,
    skip: Option<CardId>,
    placements: &mut Vec<CardPlacement>,
) {
    for (position, card) in lane.iter_mut().enumerate().skip(start) {
        if card.position() == position {
            continue;
        }
        card.set_position(position);
        if skip != Some(card.id()) {
            placements.push(CardPlacement::of(card));
        }
    }
}
