//! Diesel row models for appointment persistence.

use super::schema::appointments;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row shape shared by appointment queries, inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct AppointmentRow {
    /// Appointment identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Customer name.
    pub customer_name: String,
    /// Booked service.
    pub service_label: String,
    /// Slot start.
    pub starts_at: DateTime<Utc>,
    /// Slot length in minutes.
    pub duration_minutes: i32,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Status in storage form.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
}
