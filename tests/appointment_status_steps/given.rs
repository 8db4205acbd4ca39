//! Given steps for appointment status BDD scenarios.

use super::world::{AppointmentStatusWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use slotboard::appointment::{domain::TransitionPolicy, services::CreateAppointmentRequest};
use slotboard::tenant::TenantId;

#[given("the permissive transition policy")]
fn permissive_policy(world: &mut AppointmentStatusWorld) {
    world.policy = TransitionPolicy::Permissive;
}

#[given(r#"a pending appointment for "{customer}" booking "{service}""#)]
fn pending_appointment(
    world: &mut AppointmentStatusWorld,
    customer: String,
    service: String,
) -> Result<(), eyre::Report> {
    let request = CreateAppointmentRequest::new(
        TenantId::new(),
        customer,
        service,
        Utc::now() + Duration::days(1),
        45,
    );
    let created = run_async(world.service().create(request)).wrap_err("book appointment")?;
    world.appointment = Some(created);
    Ok(())
}

#[given(r#"the appointment status has been changed to "{status}""#)]
fn status_has_been_changed(
    world: &mut AppointmentStatusWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let id = world.appointment()?.id();
    let changed = run_async(world.service().change_status(id, &status))
        .wrap_err("change status in scenario setup")?;
    world.appointment = Some(changed);
    Ok(())
}
