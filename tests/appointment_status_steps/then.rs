//! Then steps for appointment status BDD scenarios.

use super::world::{AppointmentStatusWorld, run_async};
use rstest_bdd_macros::then;
use slotboard::appointment::{domain::AppointmentDomainError, services::AppointmentServiceError};

#[then(r#"the appointment status is "{status}""#)]
fn appointment_status_is(
    world: &mut AppointmentStatusWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let id = world.appointment()?.id();
    let stored = run_async(world.service().find_by_id(id))?
        .ok_or_else(|| eyre::eyre!("appointment {id} was not stored"))?;
    let actual = stored.status().to_string();
    if actual != status {
        return Err(eyre::eyre!("expected status {status}, found {actual}"));
    }
    Ok(())
}

#[then("the status change fails with an invalid transition error")]
fn fails_with_invalid_transition(world: &AppointmentStatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_change
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing status change result"))?;
    if !matches!(
        result,
        Err(AppointmentServiceError::Domain(
            AppointmentDomainError::InvalidTransition { .. }
        ))
    ) {
        return Err(eyre::eyre!("expected InvalidTransition error, got {result:?}"));
    }
    Ok(())
}

#[then("the status change fails with an invalid status error")]
fn fails_with_invalid_status(world: &AppointmentStatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_change
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing status change result"))?;
    if !matches!(result, Err(AppointmentServiceError::InvalidStatus(_))) {
        return Err(eyre::eyre!("expected InvalidStatus error, got {result:?}"));
    }
    Ok(())
}
