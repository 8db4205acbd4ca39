//! Repository port for integration persistence.

use crate::integration::domain::{Integration, IntegrationId, IntegrationProvider};
use crate::tenant::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for integration repository operations.
pub type IntegrationRepositoryResult<T> = Result<T, IntegrationRepositoryError>;

/// Integration persistence contract.
///
/// Implementations enforce at most one integration per tenant and provider.
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Stores a new integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::DuplicateProvider`] when the
    /// tenant already has an integration for the same provider.
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()>;

    /// Persists changes to an existing integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::NotFound`] when the integration
    /// does not exist.
    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()>;

    /// Finds a tenant's integration for `provider`.
    async fn find_by_provider(
        &self,
        tenant_id: TenantId,
        provider: IntegrationProvider,
    ) -> IntegrationRepositoryResult<Option<Integration>>;

    /// Returns every integration of a tenant, in any order.
    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> IntegrationRepositoryResult<Vec<Integration>>;
}

/// Errors returned by integration repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IntegrationRepositoryError {
    /// The tenant already has an integration for this provider.
    #[error("tenant {tenant_id} already has a {provider} integration")]
    DuplicateProvider {
        /// Owning tenant.
        tenant_id: TenantId,
        /// Conflicting provider.
        provider: IntegrationProvider,
    },

    /// The integration was not found.
    #[error("integration not found: {0}")]
    NotFound(IntegrationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IntegrationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
