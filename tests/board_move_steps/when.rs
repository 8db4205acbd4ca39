//! When steps for board move BDD scenarios.

use super::world::{BoardMoveWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use slotboard::board::domain::MoveCard;

#[when(r#"card "{card}" is moved to column "{column}" at position {position:usize}"#)]
fn move_card(
    world: &mut BoardMoveWorld,
    card: String,
    column: String,
    position: usize,
) -> Result<(), eyre::Report> {
    let request = MoveCard::new(world.card(&card)?, world.column(&column)?, position);
    world.writes_before_move = world
        .repository
        .committed_writes()
        .wrap_err("count committed writes")?;
    let store = world.store()?;
    let result = run_async(store.apply_move(request));
    world.last_move = Some(result);
    Ok(())
}
