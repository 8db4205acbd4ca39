//! Domain model for third-party integrations.

mod error;
mod ids;
mod integration;
mod settings;

pub use error::IntegrationDomainError;
pub use ids::IntegrationId;
pub use integration::{Integration, PersistedIntegrationData};
pub use settings::{IntegrationProvider, IntegrationSettings, SyncDirection, WebhookEvent};
