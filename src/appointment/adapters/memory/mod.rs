//! In-memory adapters for appointment ports.

mod repository;

pub use repository::InMemoryAppointmentRepository;
