//! `PostgreSQL` repository implementation for appointment storage.

use super::{models::AppointmentRow, schema::appointments};
use crate::appointment::{
    domain::{
        Appointment, AppointmentId, AppointmentStatus, CustomerName, DurationMinutes,
        PersistedAppointmentData, Schedule, ServiceLabel,
    },
    ports::{AppointmentRepository, AppointmentRepositoryError, AppointmentRepositoryResult},
};
use crate::tenant::TenantId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by appointment adapters.
pub type AppointmentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed appointment repository.
#[derive(Debug, Clone)]
pub struct PostgresAppointmentRepository {
    pool: AppointmentPgPool,
}

impl PostgresAppointmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AppointmentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AppointmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AppointmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AppointmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AppointmentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepository {
    async fn store(&self, appointment: &Appointment) -> AppointmentRepositoryResult<()> {
        let appointment_id = appointment.id();
        let row = appointment_to_row(appointment)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(appointments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AppointmentRepositoryError::DuplicateAppointment(appointment_id)
                    }
                    _ => AppointmentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, appointment: &Appointment) -> AppointmentRepositoryResult<()> {
        let appointment_id = appointment.id();
        let row = appointment_to_row(appointment)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                appointments::table.filter(appointments::id.eq(appointment_id.into_inner())),
            )
            .set(&row)
            .execute(connection)
            .map_err(AppointmentRepositoryError::persistence)?;
            if updated == 0 {
                return Err(AppointmentRepositoryError::NotFound(appointment_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> AppointmentRepositoryResult<Option<Appointment>> {
        self.run_blocking(move |connection| {
            let row = appointments::table
                .filter(appointments::id.eq(id.into_inner()))
                .select(AppointmentRow::as_select())
                .first::<AppointmentRow>(connection)
                .optional()
                .map_err(AppointmentRepositoryError::persistence)?;
            row.map(row_to_appointment).transpose()
        })
        .await
    }

    async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> AppointmentRepositoryResult<Vec<Appointment>> {
        self.run_blocking(move |connection| {
            appointments::table
                .filter(appointments::tenant_id.eq(tenant_id.into_inner()))
                .order((appointments::starts_at.asc(), appointments::id.asc()))
                .select(AppointmentRow::as_select())
                .load::<AppointmentRow>(connection)
                .map_err(AppointmentRepositoryError::persistence)?
                .into_iter()
                .map(row_to_appointment)
                .collect()
        })
        .await
    }
}

fn appointment_to_row(appointment: &Appointment) -> AppointmentRepositoryResult<AppointmentRow> {
    let schedule = appointment.schedule();
    Ok(AppointmentRow {
        id: appointment.id().into_inner(),
        tenant_id: appointment.tenant_id().into_inner(),
        customer_name: appointment.customer().as_str().to_owned(),
        service_label: appointment.service().as_str().to_owned(),
        starts_at: schedule.starts_at,
        duration_minutes: i32::try_from(schedule.duration.value())
            .map_err(AppointmentRepositoryError::persistence)?,
        notes: appointment.notes().map(str::to_owned),
        status: appointment.status().to_storage(),
        created_at: appointment.created_at(),
        updated_at: appointment.updated_at(),
    })
}

fn row_to_appointment(row: AppointmentRow) -> AppointmentRepositoryResult<Appointment> {
    let AppointmentRow {
        id,
        tenant_id,
        customer_name,
        service_label,
        starts_at,
        duration_minutes,
        notes,
        status,
        created_at,
        updated_at,
    } = row;

    let minutes = u32::try_from(duration_minutes).map_err(AppointmentRepositoryError::persistence)?;
    Ok(Appointment::from_persisted(PersistedAppointmentData {
        id: AppointmentId::from_uuid(id),
        tenant_id: TenantId::from_uuid(tenant_id),
        customer: CustomerName::new(customer_name)
            .map_err(AppointmentRepositoryError::persistence)?,
        service: ServiceLabel::new(service_label)
            .map_err(AppointmentRepositoryError::persistence)?,
        schedule: Schedule::new(
            starts_at,
            DurationMinutes::new(minutes).map_err(AppointmentRepositoryError::persistence)?,
        ),
        notes,
        status: AppointmentStatus::try_from(status.as_str())
            .map_err(AppointmentRepositoryError::persistence)?,
        created_at,
        updated_at,
    }))
}
