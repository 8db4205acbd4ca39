//! Board change events delivered to observers.

use super::{CardId, CardSlot, ColumnId};
use crate::tenant::TenantId;
use serde::{Deserialize, Serialize};

/// A successful board mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardChange {
    /// The board was replaced by a full reload.
    Reloaded {
        /// Tenant owning the board.
        tenant_id: TenantId,
    },
    /// A card moved to a new slot.
    CardMoved {
        /// Moved card.
        card_id: CardId,
        /// Slot it left.
        from: CardSlot,
        /// Slot it now occupies.
        to: CardSlot,
    },
    /// A card was added.
    CardAdded {
        /// New card.
        card_id: CardId,
        /// Slot it occupies.
        slot: CardSlot,
    },
    /// A card was removed.
    CardRemoved {
        /// Removed card.
        card_id: CardId,
        /// Slot it occupied.
        slot: CardSlot,
    },
    /// A column was added at the end of the board.
    ColumnAdded {
        /// New column.
        column_id: ColumnId,
    },
    /// An empty column was removed.
    ColumnRemoved {
        /// Removed column.
        column_id: ColumnId,
    },
    /// Columns were reordered.
    ColumnsReordered {
        /// Column identifiers in their new order.
        order: Vec<ColumnId>,
    },
}
