//! Appointment status values and the rules for moving between them.

use super::{AppointmentDomainError, ParseAppointmentStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

const CUSTOM_PREFIX: &str = "custom";

/// Trimmed, non-empty label of a tenant-defined status. Case is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomStatusLabel(String);

impl CustomStatusLabel {
    /// Creates a validated custom label.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::EmptyCustomLabel`] when the trimmed
    /// value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, AppointmentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppointmentDomainError::EmptyCustomLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Appointment lifecycle status.
///
/// The storage form is `pending`, `in_progress`, `completed`, `cancelled`
/// or `custom:<label>`, and serde uses the same strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AppointmentStatus {
    /// Booked, not started.
    Pending,
    /// Currently taking place.
    InProgress,
    /// Finished.
    Completed,
    /// Called off.
    Cancelled,
    /// Tenant-defined intermediate status.
    Custom(CustomStatusLabel),
}

impl AppointmentStatus {
    /// Builds a custom status.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::EmptyCustomLabel`] for a blank label.
    pub fn custom(label: impl Into<String>) -> Result<Self, AppointmentDomainError> {
        CustomStatusLabel::new(label).map(Self::Custom)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub fn to_storage(&self) -> String {
        match self {
            Self::Pending => "pending".to_owned(),
            Self::InProgress => "in_progress".to_owned(),
            Self::Completed => "completed".to_owned(),
            Self::Cancelled => "cancelled".to_owned(),
            Self::Custom(label) => format!("{CUSTOM_PREFIX}:{}", label.as_str()),
        }
    }

    /// Returns whether no further status change is allowed under the strict
    /// policy.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether the strict lifecycle permits moving to `next`.
    ///
    /// Pending may go anywhere else, in-progress may not go back to pending,
    /// custom statuses may go anywhere else, and completed or cancelled
    /// appointments are closed. Re-setting the current status is never a
    /// transition.
    #[must_use]
    pub fn can_transition_to(&self, next: &Self) -> bool {
        if self == next {
            return false;
        }
        match self {
            Self::Completed | Self::Cancelled => false,
            Self::InProgress => !matches!(next, Self::Pending),
            Self::Pending | Self::Custom(_) => true,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage())
    }
}

impl TryFrom<&str> for AppointmentStatus {
    type Error = ParseAppointmentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if let Some((keyword, label)) = trimmed.split_once(':') {
            if keyword.trim().eq_ignore_ascii_case(CUSTOM_PREFIX) {
                return Self::custom(label)
                    .map_err(|_| ParseAppointmentStatusError(value.to_owned()));
            }
            return Err(ParseAppointmentStatusError(value.to_owned()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseAppointmentStatusError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for AppointmentStatus {
    type Error = ParseAppointmentStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.to_storage()
    }
}

/// Which status changes an appointment accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Follow [`AppointmentStatus::can_transition_to`].
    #[default]
    Strict,
    /// Accept any change to a different status.
    Permissive,
}

impl TransitionPolicy {
    /// Returns whether the policy accepts moving from `from` to `to`.
    #[must_use]
    pub fn allows(self, from: &AppointmentStatus, to: &AppointmentStatus) -> bool {
        match self {
            Self::Strict => from.can_transition_to(to),
            Self::Permissive => from != to,
        }
    }
}
