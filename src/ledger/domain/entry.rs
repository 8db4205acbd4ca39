//! Ledger entry aggregate.

use super::{Category, EntryKind, LedgerDomainError, LedgerEntryId, Money};
use crate::appointment::domain::AppointmentId;
use crate::tenant::TenantId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Payment status derived from the paid timestamp and the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Settled.
    Paid,
    /// Unpaid and due before today.
    Overdue,
    /// Unpaid and not yet due.
    Pending,
}

/// One receivable or payable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    id: LedgerEntryId,
    tenant_id: TenantId,
    kind: EntryKind,
    amount: Money,
    category: Category,
    description: Option<String>,
    due_on: NaiveDate,
    paid_at: Option<DateTime<Utc>>,
    appointment_id: Option<AppointmentId>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLedgerEntryData {
    /// Persisted identifier.
    pub id: LedgerEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Persisted kind.
    pub kind: EntryKind,
    /// Persisted amount.
    pub amount: Money,
    /// Persisted category.
    pub category: Category,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted due date.
    pub due_on: NaiveDate,
    /// Persisted payment timestamp.
    pub paid_at: Option<DateTime<Utc>>,
    /// Linked appointment, if any.
    pub appointment_id: Option<AppointmentId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates an unpaid entry.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        kind: EntryKind,
        amount: Money,
        category: Category,
        due_on: NaiveDate,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            tenant_id,
            kind,
            amount,
            category,
            description: None,
            due_on,
            paid_at: None,
            appointment_id: None,
            created_at: clock.utc(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Links the entry to the appointment that produced it.
    #[must_use]
    pub const fn linked_to(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLedgerEntryData) -> Self {
        Self {
            id: data.id,
            tenant_id: data.tenant_id,
            kind: data.kind,
            amount: data.amount,
            category: data.category,
            description: data.description,
            due_on: data.due_on,
            paid_at: data.paid_at,
            appointment_id: data.appointment_id,
            created_at: data.created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> LedgerEntryId {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_on(&self) -> NaiveDate {
        self.due_on
    }

    /// Returns when the entry was paid, if it was.
    #[must_use]
    pub const fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    /// Returns the linked appointment, if any.
    #[must_use]
    pub const fn appointment_id(&self) -> Option<AppointmentId> {
        self.appointment_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Derives the payment status as seen on `today`.
    #[must_use]
    pub fn status_on(&self, today: NaiveDate) -> EntryStatus {
        if self.paid_at.is_some() {
            EntryStatus::Paid
        } else if self.due_on < today {
            EntryStatus::Overdue
        } else {
            EntryStatus::Pending
        }
    }

    /// Records payment at the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::AlreadyPaid`] when the entry is settled.
    pub fn mark_paid(&mut self, clock: &impl Clock) -> Result<(), LedgerDomainError> {
        if self.paid_at.is_some() {
            return Err(LedgerDomainError::AlreadyPaid(self.id));
        }
        self.paid_at = Some(clock.utc());
        Ok(())
    }
}
