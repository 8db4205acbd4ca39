//! In-memory integration repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::integration::{
    domain::{Integration, IntegrationId, IntegrationProvider},
    ports::{IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult},
};
use crate::tenant::TenantId;

/// Thread-safe in-memory integration repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntegrationRepository {
    state: Arc<RwLock<HashMap<IntegrationId, Integration>>>,
}

impl InMemoryIntegrationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> IntegrationRepositoryError {
    IntegrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IntegrationRepository for InMemoryIntegrationRepository {
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let taken = state.values().any(|existing| {
            existing.tenant_id() == integration.tenant_id()
                && existing.provider() == integration.provider()
        });
        if taken || state.contains_key(&integration.id()) {
            return Err(IntegrationRepositoryError::DuplicateProvider {
                tenant_id: integration.tenant_id(),
                provider: integration.provider(),
            });
        }
        state.insert(integration.id(), integration.clone());
        Ok(())
    }

    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .get_mut(&integration.id())
            .ok_or(IntegrationRepositoryError::NotFound(integration.id()))?;
        *stored = integration.clone();
        Ok(())
    }

    async fn find_by_provider(
        &self,
        tenant_id: TenantId,
        provider: IntegrationProvider,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .values()
            .find(|integration| {
                integration.tenant_id() == tenant_id && integration.provider() == provider
            })
            .cloned())
    }

    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> IntegrationRepositoryResult<Vec<Integration>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .values()
            .filter(|integration| integration.tenant_id() == tenant_id)
            .cloned()
            .collect())
    }
}
