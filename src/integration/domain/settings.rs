//! Typed per-provider settings.
//!
//! Settings serialize with a `provider` tag so a stored JSON document
//! carries its own shape:
//!
//! ```
//! use slotboard::integration::domain::{IntegrationProvider, IntegrationSettings};
//!
//! let json = r#"{"provider":"smtp","host":"mail.example.com","port":587,
//!     "username":"studio","from_address":"hello@example.com"}"#;
//! let settings: IntegrationSettings = serde_json::from_str(json).expect("valid JSON");
//! assert_eq!(settings.provider(), IntegrationProvider::Smtp);
//! assert!(settings.validate().is_ok());
//! ```

use super::IntegrationDomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// External service an integration talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationProvider {
    /// Google Calendar synchronization.
    GoogleCalendar,
    /// `WhatsApp` Business messaging.
    Whatsapp,
    /// Outbound HTTP webhook.
    Webhook,
    /// Outgoing mail server.
    Smtp,
}

impl IntegrationProvider {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoogleCalendar => "google_calendar",
            Self::Whatsapp => "whatsapp",
            Self::Webhook => "webhook",
            Self::Smtp => "smtp",
        }
    }
}

impl fmt::Display for IntegrationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way calendar events flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// Calendar events become appointments.
    Import,
    /// Appointments are published to the calendar.
    Export,
    /// Both directions.
    #[default]
    Bidirectional,
}

/// Domain event a webhook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    /// An appointment was booked.
    AppointmentCreated,
    /// An appointment changed status.
    AppointmentStatusChanged,
    /// A board card changed column or position.
    CardMoved,
    /// A ledger entry was settled.
    PaymentRecorded,
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AppointmentCreated => "appointment_created",
            Self::AppointmentStatusChanged => "appointment_status_changed",
            Self::CardMoved => "card_moved",
            Self::PaymentRecorded => "payment_recorded",
        };
        f.write_str(label)
    }
}

/// Provider-specific integration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum IntegrationSettings {
    /// Google Calendar synchronization.
    GoogleCalendar {
        /// Calendar to synchronize with.
        calendar_id: String,
        /// Direction of synchronization.
        #[serde(default)]
        sync_direction: SyncDirection,
    },
    /// `WhatsApp` Business messaging.
    Whatsapp {
        /// Numeric phone number identifier.
        phone_number_id: String,
        /// Business account identifier.
        business_account_id: String,
    },
    /// Outbound HTTP webhook.
    Webhook {
        /// Absolute HTTP(S) URL receiving the payloads.
        endpoint_url: String,
        /// Subscribed events.
        events: Vec<WebhookEvent>,
    },
    /// Outgoing mail server.
    Smtp {
        /// Server host name.
        host: String,
        /// Server port.
        port: u16,
        /// Login user name.
        username: String,
        /// Sender address.
        from_address: String,
    },
}

fn require(
    provider: IntegrationProvider,
    field: &'static str,
    value: &str,
) -> Result<(), IntegrationDomainError> {
    if value.trim().is_empty() {
        return Err(IntegrationDomainError::MissingField { provider, field });
    }
    Ok(())
}

fn validate_endpoint(url: &str) -> Result<(), IntegrationDomainError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| IntegrationDomainError::InvalidEndpoint(url.to_owned()))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(IntegrationDomainError::InvalidEndpoint(url.to_owned()));
    }
    Ok(())
}

fn validate_events(events: &[WebhookEvent]) -> Result<(), IntegrationDomainError> {
    if events.is_empty() {
        return Err(IntegrationDomainError::NoWebhookEvents);
    }
    let mut seen = BTreeSet::new();
    for event in events {
        if !seen.insert(*event) {
            return Err(IntegrationDomainError::DuplicateWebhookEvent(*event));
        }
    }
    Ok(())
}

fn validate_address(address: &str) -> Result<(), IntegrationDomainError> {
    let valid = address.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if !valid || address.chars().any(char::is_whitespace) {
        return Err(IntegrationDomainError::InvalidEmail(address.to_owned()));
    }
    Ok(())
}

impl IntegrationSettings {
    /// Returns the provider these settings configure.
    #[must_use]
    pub const fn provider(&self) -> IntegrationProvider {
        match self {
            Self::GoogleCalendar { .. } => IntegrationProvider::GoogleCalendar,
            Self::Whatsapp { .. } => IntegrationProvider::Whatsapp,
            Self::Webhook { .. } => IntegrationProvider::Webhook,
            Self::Smtp { .. } => IntegrationProvider::Smtp,
        }
    }

    /// Checks the provider-specific field rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`IntegrationDomainError`] found.
    pub fn validate(&self) -> Result<(), IntegrationDomainError> {
        let provider = self.provider();
        match self {
            Self::GoogleCalendar { calendar_id, .. } => {
                require(provider, "calendar_id", calendar_id)
            }
            Self::Whatsapp {
                phone_number_id,
                business_account_id,
            } => {
                require(provider, "phone_number_id", phone_number_id)?;
                require(provider, "business_account_id", business_account_id)?;
                if !phone_number_id.trim().chars().all(|c| c.is_ascii_digit()) {
                    return Err(IntegrationDomainError::InvalidPhoneNumberId(
                        phone_number_id.clone(),
                    ));
                }
                Ok(())
            }
            Self::Webhook {
                endpoint_url,
                events,
            } => {
                require(provider, "endpoint_url", endpoint_url)?;
                validate_endpoint(endpoint_url)?;
                validate_events(events)
            }
            Self::Smtp {
                host,
                port,
                username,
                from_address,
            } => {
                require(provider, "host", host)?;
                if *port == 0 {
                    return Err(IntegrationDomainError::InvalidPort);
                }
                require(provider, "username", username)?;
                require(provider, "from_address", from_address)?;
                validate_address(from_address)
            }
        }
    }
}
