//! Domain model for the financial ledger.
//!
//! Entries are receivables and payables with a due date; their status is
//! derived rather than stored, and summaries are computed on demand.

mod entry;
mod error;
mod summary;
mod values;

pub use entry::{EntryStatus, LedgerEntry, PersistedLedgerEntryData};
pub use error::LedgerDomainError;
pub use summary::FinancialSummary;
pub use values::{Category, DatePeriod, EntryKind, LedgerEntryId, Money};
