//! Service layer for booking appointments and changing their status.

use crate::appointment::{
    domain::{
        Appointment, AppointmentDomainError, AppointmentId, AppointmentStatus, CustomerName,
        DurationMinutes, ParseAppointmentStatusError, Schedule, ServiceLabel,
    },
    ports::{AppointmentRepository, AppointmentRepositoryError},
};
use crate::config::AppointmentConfig;
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for booking an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAppointmentRequest {
    tenant_id: TenantId,
    customer: String,
    service: String,
    starts_at: DateTime<Utc>,
    duration_minutes: u32,
    notes: Option<String>,
}

impl CreateAppointmentRequest {
    /// Creates a request with the required booking fields.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        customer: impl Into<String>,
        service: impl Into<String>,
        starts_at: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            tenant_id,
            customer: customer.into(),
            service: service.into(),
            starts_at,
            duration_minutes,
            notes: None,
        }
    }

    /// Sets booking notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Service-level errors for appointment operations.
#[derive(Debug, Error)]
pub enum AppointmentServiceError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] AppointmentDomainError),
    /// The requested status string is not a known status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseAppointmentStatusError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AppointmentRepositoryError),
}

/// Result type for appointment service operations.
pub type AppointmentServiceResult<T> = Result<T, AppointmentServiceError>;

/// Appointment orchestration service.
#[derive(Clone)]
pub struct AppointmentService<R, C>
where
    R: AppointmentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: AppointmentConfig,
}

impl<R, C> AppointmentService<R, C>
where
    R: AppointmentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new appointment service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, config: AppointmentConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Books a pending appointment.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentServiceError`] when validation fails or the
    /// repository rejects persistence.
    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
    ) -> AppointmentServiceResult<Appointment> {
        let schedule = Schedule::new(
            request.starts_at,
            DurationMinutes::new(request.duration_minutes)?,
        );
        let mut appointment = Appointment::new(
            request.tenant_id,
            CustomerName::new(request.customer)?,
            ServiceLabel::new(request.service)?,
            schedule,
            &*self.clock,
        );
        if let Some(notes) = request.notes {
            appointment = appointment.with_notes(notes);
        }
        self.repository.store(&appointment).await?;
        info!(
            tenant_id = %appointment.tenant_id(),
            appointment_id = %appointment.id(),
            starts_at = %schedule.starts_at,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Changes an appointment's status from its storage string.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentServiceError::InvalidStatus`] when `status` does
    /// not parse, [`AppointmentDomainError::InvalidTransition`] when the
    /// configured policy rejects the change, and repository errors for an
    /// unknown appointment or a failed write.
    pub async fn change_status(
        &self,
        id: AppointmentId,
        status: &str,
    ) -> AppointmentServiceResult<Appointment> {
        let next = AppointmentStatus::try_from(status)?;
        let mut appointment = self.load(id).await?;
        let previous = appointment.status().clone();

        if let Err(err) =
            appointment.transition_to(next, self.config.transition_policy, &*self.clock)
        {
            warn!(
                appointment_id = %id,
                from = %previous,
                requested = status,
                policy = ?self.config.transition_policy,
                "appointment status change rejected"
            );
            return Err(err.into());
        }

        self.repository.update(&appointment).await?;
        info!(
            appointment_id = %id,
            from = %previous,
            to = %appointment.status(),
            "appointment status changed"
        );
        Ok(appointment)
    }

    /// Moves an open appointment to a new slot.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::AlreadyClosed`] for completed or
    /// cancelled appointments, validation errors for a zero duration, and
    /// repository errors.
    pub async fn reschedule(
        &self,
        id: AppointmentId,
        starts_at: DateTime<Utc>,
        duration_minutes: u32,
    ) -> AppointmentServiceResult<Appointment> {
        let schedule = Schedule::new(starts_at, DurationMinutes::new(duration_minutes)?);
        let mut appointment = self.load(id).await?;
        appointment.reschedule(schedule, &*self.clock)?;
        self.repository.update(&appointment).await?;
        info!(appointment_id = %id, starts_at = %starts_at, "appointment rescheduled");
        Ok(appointment)
    }

    /// Retrieves an appointment by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentServiceError::Repository`] when the lookup fails.
    pub async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> AppointmentServiceResult<Option<Appointment>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists a tenant's appointments ordered by start time, then identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentServiceError::Repository`] when the lookup fails.
    pub async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> AppointmentServiceResult<Vec<Appointment>> {
        let mut appointments = self.repository.list_for_tenant(tenant_id).await?;
        appointments.sort_by(|left, right| {
            left.schedule()
                .starts_at
                .cmp(&right.schedule().starts_at)
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(appointments)
    }

    async fn load(&self, id: AppointmentId) -> AppointmentServiceResult<Appointment> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AppointmentServiceError::Repository(
                AppointmentRepositoryError::NotFound(id),
            ))
    }
}
