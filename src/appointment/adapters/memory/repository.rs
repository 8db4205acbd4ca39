//! In-memory appointment repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::appointment::{
    domain::{Appointment, AppointmentId},
    ports::{AppointmentRepository, AppointmentRepositoryError, AppointmentRepositoryResult},
};
use crate::tenant::TenantId;

/// Thread-safe in-memory appointment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAppointmentRepository {
    state: Arc<RwLock<HashMap<AppointmentId, Appointment>>>,
}

impl InMemoryAppointmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> AppointmentRepositoryResult<RwLockReadGuard<'_, HashMap<AppointmentId, Appointment>>> {
        self.state.read().map_err(|err| {
            AppointmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> AppointmentRepositoryResult<RwLockWriteGuard<'_, HashMap<AppointmentId, Appointment>>>
    {
        self.state.write().map_err(|err| {
            AppointmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn store(&self, appointment: &Appointment) -> AppointmentRepositoryResult<()> {
        let mut state = self.write()?;
        if state.contains_key(&appointment.id()) {
            return Err(AppointmentRepositoryError::DuplicateAppointment(
                appointment.id(),
            ));
        }
        state.insert(appointment.id(), appointment.clone());
        Ok(())
    }

    async fn update(&self, appointment: &Appointment) -> AppointmentRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .get_mut(&appointment.id())
            .ok_or(AppointmentRepositoryError::NotFound(appointment.id()))?;
        *stored = appointment.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> AppointmentRepositoryResult<Option<Appointment>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> AppointmentRepositoryResult<Vec<Appointment>> {
        Ok(self
            .read()?
            .values()
            .filter(|appointment| appointment.tenant_id() == tenant_id)
            .cloned()
            .collect())
    }
}
