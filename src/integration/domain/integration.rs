//! Integration aggregate.

use super::{IntegrationDomainError, IntegrationId, IntegrationProvider, IntegrationSettings};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A tenant's configuration for one external provider.
///
/// New integrations start disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    id: IntegrationId,
    tenant_id: TenantId,
    settings: IntegrationSettings,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIntegrationData {
    /// Persisted identifier.
    pub id: IntegrationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Persisted settings.
    pub settings: IntegrationSettings,
    /// Persisted enabled flag.
    pub enabled: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Integration {
    /// Creates a disabled integration from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationDomainError`] when the settings are invalid.
    pub fn new(
        tenant_id: TenantId,
        settings: IntegrationSettings,
        clock: &impl Clock,
    ) -> Result<Self, IntegrationDomainError> {
        settings.validate()?;
        let timestamp = clock.utc();
        Ok(Self {
            id: IntegrationId::new(),
            tenant_id,
            settings,
            enabled: false,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an integration from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIntegrationData) -> Self {
        Self {
            id: data.id,
            tenant_id: data.tenant_id,
            settings: data.settings,
            enabled: data.enabled,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> IntegrationId {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the provider.
    #[must_use]
    pub const fn provider(&self) -> IntegrationProvider {
        self.settings.provider()
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &IntegrationSettings {
        &self.settings
    }

    /// Returns whether the integration is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the settings, keeping identity and the enabled flag.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationDomainError::ProviderMismatch`] when `settings`
    /// configure another provider, or a validation error.
    pub fn replace_settings(
        &mut self,
        settings: IntegrationSettings,
        clock: &impl Clock,
    ) -> Result<(), IntegrationDomainError> {
        if settings.provider() != self.provider() {
            return Err(IntegrationDomainError::ProviderMismatch {
                existing: self.provider(),
                replacement: settings.provider(),
            });
        }
        settings.validate()?;
        self.settings = settings;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Sets the enabled flag and reports whether it changed.
    pub fn set_enabled(&mut self, enabled: bool, clock: &impl Clock) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.updated_at = clock.utc();
        true
    }
}
