//! Financial metrics over a period.

use super::{DatePeriod, EntryKind, EntryStatus, LedgerDomainError, LedgerEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Totals, in minor units, of the entries due inside a period.
///
/// Pending totals include overdue entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Income already received.
    pub paid_income: i64,
    /// Income still outstanding.
    pub pending_income: i64,
    /// Expenses already paid.
    pub paid_expenses: i64,
    /// Expenses still outstanding.
    pub pending_expenses: i64,
    /// `paid_income - paid_expenses`.
    pub net: i64,
    /// Unpaid income entries past their due date.
    pub overdue_receivables: usize,
    /// Entries counted.
    pub entry_count: usize,
}

impl FinancialSummary {
    /// Summarizes the entries whose due date falls inside `period`, judging
    /// overdue status as of `today`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::AmountOverflow`] when a total leaves the
    /// `i64` range.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a LedgerEntry>,
        period: DatePeriod,
        today: NaiveDate,
    ) -> Result<Self, LedgerDomainError> {
        let mut summary = Self::default();
        for entry in entries
            .into_iter()
            .filter(|entry| period.contains(entry.due_on()))
        {
            let amount = entry.amount().minor_units();
            let status = entry.status_on(today);
            let bucket = match (entry.kind(), status) {
                (EntryKind::Income, EntryStatus::Paid) => &mut summary.paid_income,
                (EntryKind::Income, _) => &mut summary.pending_income,
                (EntryKind::Expense, EntryStatus::Paid) => &mut summary.paid_expenses,
                (EntryKind::Expense, _) => &mut summary.pending_expenses,
            };
            *bucket = bucket
                .checked_add(amount)
                .ok_or(LedgerDomainError::AmountOverflow)?;
            if entry.kind() == EntryKind::Income && status == EntryStatus::Overdue {
                summary.overdue_receivables += 1;
            }
            summary.entry_count += 1;
        }
        summary.net = summary
            .paid_income
            .checked_sub(summary.paid_expenses)
            .ok_or(LedgerDomainError::AmountOverflow)?;
        Ok(summary)
    }
}
