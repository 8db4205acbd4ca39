//! Typed configuration for Slotboard services.
//!
//! Every field has a default, so partial JSON documents are accepted and
//! missing sections fall back to [`SlotboardConfig::default`].

use crate::appointment::domain::TransitionPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How concurrent edits of the same board are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Every write carries column version claims; stale writes are rejected
    /// with a conflict.
    #[default]
    VersionChecked,
    /// Writes are applied unconditionally.
    LastWriteWins,
}

/// Board store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Concurrency reconciliation mode.
    pub concurrency: ConcurrencyMode,
    /// Whether a reload notifies observers.
    pub notify_on_reload: bool,
    /// Whether positions repaired while loading are written back.
    pub persist_load_repairs: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            concurrency: ConcurrencyMode::VersionChecked,
            notify_on_reload: true,
            persist_load_repairs: true,
        }
    }
}

impl BoardConfig {
    /// Version-checked writes with load repairs persisted.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Last-write-wins without touching storage on load.
    ///
    /// Matches a single small team editing one board.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            concurrency: ConcurrencyMode::LastWriteWins,
            notify_on_reload: true,
            persist_load_repairs: false,
        }
    }
}

/// Appointment service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentConfig {
    /// Which status changes are accepted.
    pub transition_policy: TransitionPolicy,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotboardConfig {
    /// Board store settings.
    pub board: BoardConfig,
    /// Appointment settings.
    pub appointments: AppointmentConfig,
}

/// Error returned when a configuration document cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

impl SlotboardConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is not valid JSON or names
    /// an unknown enum value.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }
}
