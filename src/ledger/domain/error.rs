//! Error types for ledger validation and aggregation.

use super::LedgerEntryId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while building ledger values or summarizing entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerDomainError {
    /// Amounts are strictly positive; the kind carries the sign.
    #[error("amount must be positive, got {0} minor units")]
    NonPositiveAmount(i64),

    /// The category is empty after trimming.
    #[error("ledger category must not be empty")]
    EmptyCategory,

    /// The entry kind is not recognized.
    #[error("unknown ledger entry kind: {0}")]
    UnknownEntryKind(String),

    /// The period ends before it starts.
    #[error("invalid period: {start} is after {end}")]
    InvalidPeriod {
        /// First day of the period.
        start: NaiveDate,
        /// Last day of the period.
        end: NaiveDate,
    },

    /// The entry has already been settled.
    #[error("ledger entry {0} is already paid")]
    AlreadyPaid(LedgerEntryId),

    /// A running total left the representable range.
    #[error("ledger totals overflowed")]
    AmountOverflow,
}
