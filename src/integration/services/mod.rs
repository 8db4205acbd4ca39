//! Service layer for configuring tenant integrations.

use crate::integration::{
    domain::{Integration, IntegrationDomainError, IntegrationProvider, IntegrationSettings},
    ports::{IntegrationRepository, IntegrationRepositoryError},
};
use crate::tenant::TenantId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for integration operations.
#[derive(Debug, Error)]
pub enum IntegrationServiceError {
    /// Settings failed validation.
    #[error(transparent)]
    Domain(#[from] IntegrationDomainError),
    /// The tenant has not configured this provider.
    #[error("{provider} is not configured for tenant {tenant_id}")]
    NotConfigured {
        /// Tenant that was queried.
        tenant_id: TenantId,
        /// Missing provider.
        provider: IntegrationProvider,
    },
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IntegrationRepositoryError),
}

/// Result type for integration service operations.
pub type IntegrationServiceResult<T> = Result<T, IntegrationServiceError>;

/// Integration management service.
#[derive(Clone)]
pub struct IntegrationService<R, C>
where
    R: IntegrationRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> IntegrationService<R, C>
where
    R: IntegrationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new integration service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates or replaces the tenant's settings for the provider the
    /// settings describe.
    ///
    /// Replacing keeps the identifier, enabled flag and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::Domain`] for invalid settings and
    /// repository errors when persistence fails.
    pub async fn configure(
        &self,
        tenant_id: TenantId,
        settings: IntegrationSettings,
    ) -> IntegrationServiceResult<Integration> {
        let provider = settings.provider();
        if let Some(mut existing) = self.repository.find_by_provider(tenant_id, provider).await? {
            existing.replace_settings(settings, &*self.clock)?;
            self.repository.update(&existing).await?;
            info!(%tenant_id, provider = provider.as_str(), "integration settings replaced");
            return Ok(existing);
        }

        let integration = Integration::new(tenant_id, settings, &*self.clock)?;
        self.repository.store(&integration).await?;
        info!(
            %tenant_id,
            provider = provider.as_str(),
            integration_id = %integration.id(),
            "integration configured"
        );
        Ok(integration)
    }

    /// Activates a configured integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::NotConfigured`] when the provider
    /// has no settings, or repository errors.
    pub async fn enable(
        &self,
        tenant_id: TenantId,
        provider: IntegrationProvider,
    ) -> IntegrationServiceResult<Integration> {
        self.set_enabled(tenant_id, provider, true).await
    }

    /// Deactivates a configured integration, keeping its settings.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::NotConfigured`] when the provider
    /// has no settings, or repository errors.
    pub async fn disable(
        &self,
        tenant_id: TenantId,
        provider: IntegrationProvider,
    ) -> IntegrationServiceResult<Integration> {
        self.set_enabled(tenant_id, provider, false).await
    }

    /// Finds the tenant's integration for `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::Repository`] when the lookup fails.
    pub async fn find_by_provider(
        &self,
        tenant_id: TenantId,
        provider: IntegrationProvider,
    ) -> IntegrationServiceResult<Option<Integration>> {
        Ok(self.repository.find_by_provider(tenant_id, provider).await?)
    }

    /// Lists the tenant's integrations ordered by provider.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::Repository`] when the lookup fails.
    pub async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> IntegrationServiceResult<Vec<Integration>> {
        let mut integrations = self.repository.list_for_tenant(tenant_id).await?;
        integrations.sort_by_key(Integration::provider);
        Ok(integrations)
    }

    async fn set_enabled(
        &self,
        tenant_id: TenantId,
        provider: IntegrationProvider,
        enabled: bool,
    ) -> IntegrationServiceResult<Integration> {
        let mut integration = self
            .repository
            .find_by_provider(tenant_id, provider)
            .await?
            .ok_or(IntegrationServiceError::NotConfigured {
                tenant_id,
                provider,
            })?;
        if !integration.set_enabled(enabled, &*self.clock) {
            debug!(%tenant_id, provider = provider.as_str(), enabled, "integration unchanged");
            return Ok(integration);
        }
        self.repository.update(&integration).await?;
        info!(%tenant_id, provider = provider.as_str(), enabled, "integration toggled");
        Ok(integration)
    }
}
