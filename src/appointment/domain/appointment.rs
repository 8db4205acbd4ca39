//! Appointment aggregate root.

use super::{
    AppointmentDomainError, AppointmentId, AppointmentStatus, CustomerName, DurationMinutes,
    ServiceLabel, TransitionPolicy,
};
use crate::tenant::TenantId;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Scheduled slot of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Start of the slot.
    pub starts_at: DateTime<Utc>,
    /// Length of the slot.
    pub duration: DurationMinutes,
}

impl Schedule {
    /// Creates a schedule.
    #[must_use]
    pub const fn new(starts_at: DateTime<Utc>, duration: DurationMinutes) -> Self {
        Self {
            starts_at,
            duration,
        }
    }

    /// Returns the end of the slot.
    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(i64::from(self.duration.value()))
    }
}

/// Appointment aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    id: AppointmentId,
    tenant_id: TenantId,
    customer: CustomerName,
    service: ServiceLabel,
    schedule: Schedule,
    notes: Option<String>,
    status: AppointmentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAppointmentData {
    /// Persisted identifier.
    pub id: AppointmentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Persisted customer name.
    pub customer: CustomerName,
    /// Persisted service label.
    pub service: ServiceLabel,
    /// Persisted schedule.
    pub schedule: Schedule,
    /// Persisted notes.
    pub notes: Option<String>,
    /// Persisted status.
    pub status: AppointmentStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Books a new pending appointment.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        customer: CustomerName,
        service: ServiceLabel,
        schedule: Schedule,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AppointmentId::new(),
            tenant_id,
            customer,
            service,
            schedule,
            notes: None,
            status: AppointmentStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Sets free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Reconstructs an appointment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAppointmentData) -> Self {
        Self {
            id: data.id,
            tenant_id: data.tenant_id,
            customer: data.customer,
            service: data.service,
            schedule: data.schedule,
            notes: data.notes,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> AppointmentId {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the customer name.
    #[must_use]
    pub const fn customer(&self) -> &CustomerName {
        &self.customer
    }

    /// Returns the booked service.
    #[must_use]
    pub const fn service(&self) -> &ServiceLabel {
        &self.service
    }

    /// Returns the scheduled slot.
    #[must_use]
    pub const fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Returns the notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> &AppointmentStatus {
        &self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Changes the status if `policy` allows it.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::InvalidTransition`] when the policy
    /// rejects the change; the appointment is left untouched.
    pub fn transition_to(
        &mut self,
        next: AppointmentStatus,
        policy: TransitionPolicy,
        clock: &impl Clock,
    ) -> Result<(), AppointmentDomainError> {
        if !policy.allows(&self.status, &next) {
            return Err(AppointmentDomainError::InvalidTransition {
                appointment_id: self.id,
                from: self.status.clone(),
                to: next,
            });
        }
        self.status = next;
        self.touch(clock);
        Ok(())
    }

    /// Moves the appointment to a new slot.
    ///
    /// # Errors
    ///
    /// Returns [`AppointmentDomainError::AlreadyClosed`] for completed or
    /// cancelled appointments.
    pub fn reschedule(
        &mut self,
        schedule: Schedule,
        clock: &impl Clock,
    ) -> Result<(), AppointmentDomainError> {
        if self.status.is_terminal() {
            return Err(AppointmentDomainError::AlreadyClosed {
                appointment_id: self.id,
                status: self.status.clone(),
            });
        }
        self.schedule = schedule;
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
