//! Identifier and validated scalar types for appointments.

use super::AppointmentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    /// Creates a new random appointment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an appointment identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed, non-empty customer name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerName(String);

impl CustomerName {
    /// Creates a validated customer name.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::EmptyCustomerName`] when the trimmed
    /// value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, AppointmentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppointmentDomainError::EmptyCustomerName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, non-empty label of the booked service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceLabel(String);

impl ServiceLabel {
    /// Creates a validated service label.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::EmptyServiceLabel`] when the trimmed
    /// value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, AppointmentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppointmentDomainError::EmptyServiceLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Positive appointment length in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMinutes(u32);

impl DurationMinutes {
    /// Creates a validated duration.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::InvalidDuration`] for zero.
    pub const fn new(minutes: u32) -> Result<Self, AppointmentDomainError> {
        if minutes == 0 {
            return Err(AppointmentDomainError::InvalidDuration(minutes));
        }
        Ok(Self(minutes))
    }

    /// Returns the number of minutes.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}
