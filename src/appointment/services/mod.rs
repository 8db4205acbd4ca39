//! Application services for appointments.

mod lifecycle;

pub use lifecycle::{
    AppointmentService, AppointmentServiceError, AppointmentServiceResult,
    CreateAppointmentRequest,
};
