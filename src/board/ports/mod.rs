//! Port contracts for the Kanban board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod observer;
pub mod repository;

pub use observer::BoardObserver;
pub use repository::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, BoardWrite};
