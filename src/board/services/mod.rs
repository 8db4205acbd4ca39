//! Application services for the Kanban board.

mod error;
mod store;

pub use error::{BoardErrorKind, BoardStoreError, BoardStoreResult};
pub use store::{AddCardRequest, AddColumnRequest, BoardStore, SubscriptionId};
