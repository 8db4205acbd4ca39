//! When steps for appointment status BDD scenarios.

use super::world::{AppointmentStatusWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"the appointment status is changed to "{status}""#)]
fn change_status(world: &mut AppointmentStatusWorld, status: String) -> Result<(), eyre::Report> {
    let id = world.appointment()?.id();
    let result = run_async(world.service().change_status(id, &status));
    if let Ok(ref updated) = result {
        world.appointment = Some(updated.clone());
    }
    world.last_change = Some(result);
    Ok(())
}
