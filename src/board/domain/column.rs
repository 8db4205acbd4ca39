//! Board column entity and its validated attributes.

use super::{BoardDomainError, ColumnId, ColumnVersion, WipLimit};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_COLUMN_NAME_CHARS: usize = 100;

/// Validated, trimmed column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    /// Creates a validated column name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] when the trimmed value is
    /// empty, or [`BoardDomainError::ColumnNameTooLong`] when it exceeds 100
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyColumnName);
        }
        if trimmed.chars().count() > MAX_COLUMN_NAME_CHARS {
            return Err(BoardDomainError::ColumnNameTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display color of a column in lowercase `#rrggbb` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnColor(String);

impl ColumnColor {
    /// Creates a validated column color.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidColumnColor`] unless the value is a
    /// `#` followed by exactly six hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let is_valid = normalized
            .strip_prefix('#')
            .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()));
        if !is_valid {
            return Err(BoardDomainError::InvalidColumnColor(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the color as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ColumnColor {
    fn default() -> Self {
        Self("#64748b".to_owned())
    }
}

impl fmt::Display for ColumnColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kanban column.
///
/// The ordering index is owned by the board: it is assigned when the column
/// joins a board and rewritten whenever columns are reordered or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    name: ColumnName,
    color: ColumnColor,
    index: usize,
    wip_limit: Option<WipLimit>,
    terminal: bool,
    version: ColumnVersion,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Persisted name.
    pub name: ColumnName,
    /// Persisted display color.
    pub color: ColumnColor,
    /// Persisted ordering index.
    pub index: usize,
    /// Persisted WIP limit, if any.
    pub wip_limit: Option<WipLimit>,
    /// Whether cards in this column count as completed.
    pub terminal: bool,
    /// Persisted version.
    pub version: ColumnVersion,
}

impl Column {
    /// Creates a new column with a placeholder index of zero.
    #[must_use]
    pub fn new(name: ColumnName, color: ColumnColor) -> Self {
        Self {
            id: ColumnId::new(),
            name,
            color,
            index: 0,
            wip_limit: None,
            terminal: false,
            version: ColumnVersion::INITIAL,
        }
    }

    /// Sets the WIP limit.
    #[must_use]
    pub const fn with_wip_limit(mut self, limit: WipLimit) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    /// Marks the column as terminal: cards entering it are completed.
    #[must_use]
    pub const fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            color: data.color,
            index: data.index,
            wip_limit: data.wip_limit,
            terminal: data.terminal,
            version: data.version,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the column name.
    #[must_use]
    pub const fn name(&self) -> &ColumnName {
        &self.name
    }

    /// Returns the display color.
    #[must_use]
    pub const fn color(&self) -> &ColumnColor {
        &self.color
    }

    /// Returns the zero-based ordering index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the WIP limit, if any.
    #[must_use]
    pub const fn wip_limit(&self) -> Option<WipLimit> {
        self.wip_limit
    }

    /// Returns whether cards in this column count as completed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Returns the current version.
    #[must_use]
    pub const fn version(&self) -> ColumnVersion {
        self.version
    }

    pub(super) const fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(super) const fn bump_version(&mut self) {
        self.version = self.version.next();
    }
}
