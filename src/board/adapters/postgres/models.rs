//! Diesel row models for board persistence.

use super::schema::{board_cards, board_columns};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row shape shared by column queries and inserts.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Ordering index.
    pub ordinal: i32,
    /// Optional WIP limit.
    pub wip_limit: Option<i32>,
    /// Terminal flag.
    pub is_terminal: bool,
    /// Column version.
    pub version: i64,
}

/// Row shape shared by card queries and inserts.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = board_cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CardRow {
    /// Card identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Column holding the card.
    pub column_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority keyword.
    pub priority: String,
    /// Position inside the column.
    pub position: i32,
    /// Optional due timestamp.
    pub due_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
