//! Domain model for the Kanban board.
//!
//! The board keeps ordered columns and, per column, a dense lane of cards.
//! Every mutation validates before it changes anything and reports the card
//! placements and column version swaps that persistence has to mirror.

mod board;
mod card;
mod change;
mod column;
mod error;
mod ids;
mod placement;
mod stats;

pub use board::{Board, BoardSnapshot, LoadedBoard};
pub use card::{Card, CardPriority, CardTitle, PersistedCardData};
pub use change::BoardChange;
pub use column::{Column, ColumnColor, ColumnName, PersistedColumnData};
pub use error::BoardDomainError;
pub use ids::{CardId, ColumnId, ColumnVersion, WipLimit};
pub use placement::{
    CardPlacement, CardSlot, ColumnLayout, ColumnVersionClaim, MoveCard, MoveOutcome,
    RemovedCard,
};
pub use stats::ColumnStats;
