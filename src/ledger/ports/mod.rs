//! Port contracts for ledger persistence.

pub mod repository;

pub use repository::{LedgerRepository, LedgerRepositoryError, LedgerRepositoryResult};
