//! Diesel schema for appointment persistence.

diesel::table! {
    /// Appointments of every tenant.
    appointments (id) {
        /// Appointment identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Customer name.
        #[max_length = 255]
        customer_name -> Varchar,
        /// Booked service.
        #[max_length = 255]
        service_label -> Varchar,
        /// Slot start.
        starts_at -> Timestamptz,
        /// Slot length in minutes.
        duration_minutes -> Int4,
        /// Free-form notes.
        notes -> Nullable<Text>,
        /// Status in storage form, e.g. `in_progress` or `custom:<label>`.
        #[max_length = 120]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last change timestamp.
        updated_at -> Timestamptz,
    }
}
