//! Service layer for recording, settling and summarizing ledger entries.

use crate::appointment::domain::AppointmentId;
use crate::ledger::{
    domain::{
        Category, DatePeriod, EntryKind, FinancialSummary, LedgerDomainError, LedgerEntry,
        LedgerEntryId, Money,
    },
    ports::{LedgerRepository, LedgerRepositoryError},
};
use crate::tenant::TenantId;
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for recording a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntryRequest {
    tenant_id: TenantId,
    kind: EntryKind,
    amount_minor: i64,
    category: String,
    due_on: NaiveDate,
    description: Option<String>,
    appointment_id: Option<AppointmentId>,
}

impl RecordEntryRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        kind: EntryKind,
        amount_minor: i64,
        category: impl Into<String>,
        due_on: NaiveDate,
    ) -> Self {
        Self {
            tenant_id,
            kind,
            amount_minor,
            category: category.into(),
            due_on,
            description: None,
            appointment_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Links the entry to an appointment.
    #[must_use]
    pub const fn for_appointment(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }
}

/// Service-level errors for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerServiceError {
    /// Domain validation or aggregation failed.
    #[error(transparent)]
    Domain(#[from] LedgerDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] LedgerRepositoryError),
}

/// Result type for ledger service operations.
pub type LedgerServiceResult<T> = Result<T, LedgerServiceError>;

/// Ledger orchestration service.
#[derive(Clone)]
pub struct LedgerService<R, C>
where
    R: LedgerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> LedgerService<R, C>
where
    R: LedgerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new ledger service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Records an unpaid entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError`] when validation fails or the repository
    /// rejects persistence.
    pub async fn record_entry(&self, request: RecordEntryRequest) -> LedgerServiceResult<LedgerEntry> {
        let mut entry = LedgerEntry::new(
            request.tenant_id,
            request.kind,
            Money::from_minor(request.amount_minor)?,
            Category::new(request.category)?,
            request.due_on,
            &*self.clock,
        );
        if let Some(description) = request.description {
            entry = entry.with_description(description);
        }
        if let Some(appointment_id) = request.appointment_id {
            entry = entry.linked_to(appointment_id);
        }
        self.repository.store(&entry).await?;
        info!(
            tenant_id = %entry.tenant_id(),
            entry_id = %entry.id(),
            kind = entry.kind().as_str(),
            amount = %entry.amount(),
            "ledger entry recorded"
        );
        Ok(entry)
    }

    /// Settles an entry at the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::AlreadyPaid`] for a settled entry,
    /// [`LedgerRepositoryError::NotFound`] for an unknown one, and other
    /// repository errors.
    pub async fn mark_paid(&self, id: LedgerEntryId) -> LedgerServiceResult<LedgerEntry> {
        let mut entry = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(LedgerRepositoryError::NotFound(id))?;
        entry.mark_paid(&*self.clock)?;
        self.repository.update(&entry).await?;
        info!(entry_id = %id, "ledger entry paid");
        Ok(entry)
    }

    /// Retrieves an entry by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: LedgerEntryId) -> LedgerServiceResult<Option<LedgerEntry>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists a tenant's entries due inside `period`, ordered by due date and
    /// then identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError::Repository`] when the lookup fails.
    pub async fn list_entries(
        &self,
        tenant_id: TenantId,
        period: DatePeriod,
    ) -> LedgerServiceResult<Vec<LedgerEntry>> {
        let mut entries = self.repository.list_due_in(tenant_id, period).await?;
        entries.sort_by(|left, right| {
            left.due_on()
                .cmp(&right.due_on())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(entries)
    }

    /// Computes the financial summary of `period` as seen on `today`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::AmountOverflow`] when totals overflow and
    /// repository errors when the lookup fails.
    pub async fn summary(
        &self,
        tenant_id: TenantId,
        period: DatePeriod,
        today: NaiveDate,
    ) -> LedgerServiceResult<FinancialSummary> {
        let entries = self.repository.list_due_in(tenant_id, period).await?;
        let summary = FinancialSummary::from_entries(&entries, period, today)?;
        debug!(
            %tenant_id,
            start = %period.start(),
            end = %period.end(),
            entries = summary.entry_count,
            net = summary.net,
            "ledger summary computed"
        );
        Ok(summary)
    }
}
