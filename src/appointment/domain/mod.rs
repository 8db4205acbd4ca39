//! Domain model for appointments and their status lifecycle.

mod appointment;
mod error;
mod ids;
mod status;

pub use appointment::{Appointment, PersistedAppointmentData, Schedule};
pub use error::{AppointmentDomainError, ParseAppointmentStatusError};
pub use ids::{AppointmentId, CustomerName, DurationMinutes, ServiceLabel};
pub use status::{AppointmentStatus, CustomStatusLabel, TransitionPolicy};
