//! Derived per-column statistics.

use super::{Card, ColumnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary counts for one column at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column the counts describe.
    pub column_id: ColumnId,
    /// Number of cards in the column.
    pub card_count: usize,
    /// Cards with high or urgent priority.
    pub high_priority_count: usize,
    /// Open cards whose due timestamp is strictly before `now`.
    pub overdue_count: usize,
}

impl ColumnStats {
    /// Computes statistics for the cards of one column.
    #[must_use]
    pub fn for_cards(column_id: ColumnId, cards: &[Card], now: DateTime<Utc>) -> Self {
        Self {
            column_id,
            card_count: cards.len(),
            high_priority_count: cards
                .iter()
                .filter(|card| card.priority().is_high())
                .count(),
            overdue_count: cards.iter().filter(|card| card.is_overdue_at(now)).count(),
        }
    }
}
