//! In-memory ledger repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ledger::{
    domain::{DatePeriod, LedgerEntry, LedgerEntryId},
    ports::{LedgerRepository, LedgerRepositoryError, LedgerRepositoryResult},
};
use crate::tenant::TenantId;

/// Thread-safe in-memory ledger repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerRepository {
    state: Arc<RwLock<HashMap<LedgerEntryId, LedgerEntry>>>,
}

impl InMemoryLedgerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> LedgerRepositoryError {
    LedgerRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn store(&self, entry: &LedgerEntry) -> LedgerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.contains_key(&entry.id()) {
            return Err(LedgerRepositoryError::DuplicateEntry(entry.id()));
        }
        state.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &LedgerEntry) -> LedgerRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .get_mut(&entry.id())
            .ok_or(LedgerRepositoryError::NotFound(entry.id()))?;
        *stored = entry.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: LedgerEntryId) -> LedgerRepositoryResult<Option<LedgerEntry>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_due_in(
        &self,
        tenant_id: TenantId,
        period: DatePeriod,
    ) -> LedgerRepositoryResult<Vec<LedgerEntry>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .values()
            .filter(|entry| entry.tenant_id() == tenant_id && period.contains(entry.due_on()))
            .cloned()
            .collect())
    }
}
