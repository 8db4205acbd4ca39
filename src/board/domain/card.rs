//! Board card entity and priority levels.

use super::{BoardDomainError, CardId, ColumnId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPriority {
    /// Can wait.
    Low,
    /// Normal priority.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
    /// Needs attention now.
    Urgent,
}

impl CardPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Returns whether the priority counts towards high-priority statistics.
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

impl fmt::Display for CardPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CardPriority {
    type Error = BoardDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(BoardDomainError::UnknownPriority(value.to_owned())),
        }
    }
}

/// Validated, trimmed card title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardTitle(String);

impl CardTitle {
    /// Creates a validated card title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyCardTitle`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyCardTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kanban card.
///
/// Column membership and position are owned by the board; a card built with
/// [`Card::new`] gets its real placement when the board accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    column_id: ColumnId,
    title: CardTitle,
    description: Option<String>,
    priority: CardPriority,
    position: usize,
    due_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCardData {
    /// Persisted card identifier.
    pub id: CardId,
    /// Persisted owning column.
    pub column_id: ColumnId,
    /// Persisted title.
    pub title: CardTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted priority.
    pub priority: CardPriority,
    /// Persisted position inside the column.
    pub position: usize,
    /// Persisted due timestamp.
    pub due_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Creates a new card destined for `column_id`.
    #[must_use]
    pub fn new(
        column_id: ColumnId,
        title: CardTitle,
        priority: CardPriority,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: CardId::new(),
            column_id,
            title,
            description: None,
            priority,
            position: 0,
            due_at: None,
            completed_at: None,
            created_at: clock.utc(),
        }
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

    /// Reconstructs a card from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCardData) -> Self {
        Self {
            id: data.id,
            column_id: data.column_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            position: data.position,
            due_at: data.due_at,
            completed_at: data.completed_at,
            created_at: data.created_at,
        }
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    /// Returns the owning column.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &CardTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> CardPriority {
        self.priority
    }

    /// Returns the zero-based position inside the owning column.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the due timestamp, if any.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the card is past due and still open at `now`.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.completed_at.is_none() && self.due_at.is_some_and(|due| due < now)
    }

    pub(super) const fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Moves the card into `column_id`, applying the terminal-column
    /// completion convention.
    pub(super) fn relocate(&mut self, column_id: ColumnId, terminal: bool, now: DateTime<Utc>) {
        self.column_id = column_id;
        if terminal {
            self.completed_at.get_or_insert(now);
        } else {
            self.completed_at = None;
        }
    }
}
