//! Repository port for appointment persistence and lookup.

use crate::appointment::domain::{Appointment, AppointmentId};
use crate::tenant::TenantId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for appointment repository operations.
pub type AppointmentRepositoryResult<T> = Result<T, AppointmentRepositoryError>;

/// Appointment persistence contract.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Stores a new appointment.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentRepositoryError::DuplicateAppointment`] when the
    /// identifier already exists.
    async fn store(&self, appointment: &Appointment) -> AppointmentRepositoryResult<()>;

    /// Persists changes to an existing appointment.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentRepositoryError::NotFound`] when the appointment
    /// does not exist.
    async fn update(&self, appointment: &Appointment) -> AppointmentRepositoryResult<()>;

    /// Finds an appointment by identifier.
    async fn find_by_id(&self, id: AppointmentId)
    -> AppointmentRepositoryResult<Option<Appointment>>;

    /// Returns every appointment of a tenant, in any order.
    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> AppointmentRepositoryResult<Vec<Appointment>>;
}

/// Errors returned by appointment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AppointmentRepositoryError {
    /// An appointment with the same identifier already exists.
    #[error("duplicate appointment identifier: {0}")]
    DuplicateAppointment(AppointmentId),

    /// The appointment was not found.
    #[error("appointment not found: {0}")]
    NotFound(AppointmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AppointmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
