//! Observer that records every board change it receives.

use crate::board::{domain::BoardChange, ports::BoardObserver};
use std::sync::{Arc, Mutex, PoisonError};

/// Collects board changes in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingBoardObserver {
    changes: Arc<Mutex<Vec<BoardChange>>>,
}

impl RecordingBoardObserver {
    /// Creates an observer with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded changes.
    #[must_use]
    pub fn changes(&self) -> Vec<BoardChange> {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BoardObserver for RecordingBoardObserver {
    fn board_changed(&self, change: &BoardChange) {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change.clone());
    }
}
