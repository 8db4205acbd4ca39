//! Repository port for ledger persistence.

use crate::ledger::domain::{DatePeriod, LedgerEntry, LedgerEntryId};
use crate::tenant::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ledger repository operations.
pub type LedgerRepositoryResult<T> = Result<T, LedgerRepositoryError>;

/// Ledger persistence contract.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerRepositoryError::DuplicateEntry`] when the identifier
    /// already exists.
    async fn store(&self, entry: &LedgerEntry) -> LedgerRepositoryResult<()>;

    /// Persists changes to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerRepositoryError::NotFound`] when the entry does not
    /// exist.
    async fn update(&self, entry: &LedgerEntry) -> LedgerRepositoryResult<()>;

    /// Finds an entry by identifier.
    async fn find_by_id(&self, id: LedgerEntryId) -> LedgerRepositoryResult<Option<LedgerEntry>>;

    /// Returns a tenant's entries due inside `period`, in any order.
    async fn list_due_in(
        &self,
        tenant_id: TenantId,
        period: DatePeriod,
    ) -> LedgerRepositoryResult<Vec<LedgerEntry>>;
}

/// Errors returned by ledger repository implementations.
#[derive(Debug, Clone, Error)]
pub enum LedgerRepositoryError {
    /// An entry with the same identifier already exists.
    #[error("duplicate ledger entry identifier: {0}")]
    DuplicateEntry(LedgerEntryId),

    /// The entry was not found.
    #[error("ledger entry not found: {0}")]
    NotFound(LedgerEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LedgerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
