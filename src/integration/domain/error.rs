//! Error types for integration settings and lifecycle rules.

use super::{IntegrationProvider, WebhookEvent};
use thiserror::Error;

/// Errors returned while validating integration settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrationDomainError {
    /// A required text field is empty after trimming.
    #[error("{provider} setting `{field}` must not be empty")]
    MissingField {
        /// Provider whose settings were rejected.
        provider: IntegrationProvider,
        /// Name of the empty field.
        field: &'static str,
    },

    /// The `WhatsApp` phone number identifier contains non-digits.
    #[error("whatsapp phone number id must be numeric: {0}")]
    InvalidPhoneNumberId(String),

    /// The webhook endpoint is not an absolute HTTP(S) URL.
    #[error("webhook endpoint must be an absolute http(s) URL: {0}")]
    InvalidEndpoint(String),

    /// A webhook subscribes to no events.
    #[error("webhook must subscribe to at least one event")]
    NoWebhookEvents,

    /// A webhook lists the same event twice.
    #[error("webhook event listed more than once: {0}")]
    DuplicateWebhookEvent(WebhookEvent),

    /// The SMTP port is zero.
    #[error("smtp port must be non-zero")]
    InvalidPort,

    /// The sender address is not shaped like `local@domain`.
    #[error("invalid sender address: {0}")]
    InvalidEmail(String),

    /// Replacement settings belong to a different provider.
    #[error("cannot replace {existing} settings with {replacement} settings")]
    ProviderMismatch {
        /// Provider of the stored integration.
        existing: IntegrationProvider,
        /// Provider of the rejected settings.
        replacement: IntegrationProvider,
    },
}
