//! Shared world state for appointment status BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use slotboard::appointment::{
    adapters::memory::InMemoryAppointmentRepository,
    domain::{Appointment, TransitionPolicy},
    services::{AppointmentService, AppointmentServiceError},
};
use slotboard::config::AppointmentConfig;

/// Service type used by the BDD world.
pub type TestAppointmentService = AppointmentService<InMemoryAppointmentRepository, DefaultClock>;

/// Scenario world for appointment status behaviour tests.
pub struct AppointmentStatusWorld {
    pub policy: TransitionPolicy,
    pub service: Option<TestAppointmentService>,
    pub appointment: Option<Appointment>,
    pub last_change: Option<Result<Appointment, AppointmentServiceError>>,
}

impl AppointmentStatusWorld {
    /// Creates a world using the strict policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: TransitionPolicy::Strict,
            service: None,
            appointment: None,
            last_change: None,
        }
    }

    /// Builds the service on first use with the configured policy.
    pub fn service(&mut self) -> &TestAppointmentService {
        let policy = self.policy;
        self.service.get_or_insert_with(|| {
            AppointmentService::new(
                Arc::new(InMemoryAppointmentRepository::new()),
                Arc::new(DefaultClock),
                AppointmentConfig {
                    transition_policy: policy,
                },
            )
        })
    }

    /// Returns the appointment under test.
    pub fn appointment(&self) -> Result<&Appointment, eyre::Report> {
        self.appointment
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing appointment in scenario world"))
    }
}

impl Default for AppointmentStatusWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AppointmentStatusWorld {
    AppointmentStatusWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
