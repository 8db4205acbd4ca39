//! In-memory board adapters.

mod observer;
mod repository;

pub use observer::RecordingBoardObserver;
pub use repository::{InMemoryBoardRepository, InjectedFailure};
