//! Port contracts for appointment persistence.

pub mod repository;

pub use repository::{AppointmentRepository, AppointmentRepositoryError, AppointmentRepositoryResult};
