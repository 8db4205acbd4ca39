//! Observer port for board change notifications.

use crate::board::domain::BoardChange;

/// Receives one notification per successful board mutation.
///
/// Observers run synchronously on the mutating task, after persistence has
/// succeeded, and must not block.
pub trait BoardObserver: Send + Sync {
    /// Handles a board change.
    fn board_changed(&self, change: &BoardChange);
}

impl<F> BoardObserver for F
where
    F: Fn(&BoardChange) + Send + Sync,
{
    fn board_changed(&self, change: &BoardChange) {
        self(change);
    }
}
