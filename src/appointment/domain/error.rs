//! Error types for appointment validation and status changes.

use super::{AppointmentId, AppointmentStatus};
use thiserror::Error;

/// Errors returned while building appointments or changing their status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppointmentDomainError {
    /// The customer name is empty after trimming.
    #[error("customer name must not be empty")]
    EmptyCustomerName,

    /// The service label is empty after trimming.
    #[error("service label must not be empty")]
    EmptyServiceLabel,

    /// The duration is zero.
    #[error("invalid duration of {0} minutes, expected a positive value")]
    InvalidDuration(u32),

    /// A custom status label is empty after trimming.
    #[error("custom status label must not be empty")]
    EmptyCustomLabel,

    /// The active transition policy rejects the status change.
    #[error("appointment {appointment_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Appointment being changed.
        appointment_id: AppointmentId,
        /// Current status.
        from: AppointmentStatus,
        /// Requested status.
        to: AppointmentStatus,
    },

    /// Completed and cancelled appointments keep their schedule.
    #[error("appointment {appointment_id} is {status} and cannot be rescheduled")]
    AlreadyClosed {
        /// Appointment being rescheduled.
        appointment_id: AppointmentId,
        /// Its terminal status.
        status: AppointmentStatus,
    },
}

/// Error returned while parsing an appointment status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown appointment status: {0}")]
pub struct ParseAppointmentStatusError(pub String);
