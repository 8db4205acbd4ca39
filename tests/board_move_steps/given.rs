//! Given steps for board move BDD scenarios.

use super::world::{BoardMoveWorld, run_async, titles};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use slotboard::board::{
    domain::MoveCard,
    services::{AddCardRequest, AddColumnRequest},
};

#[given(r#"a board with column "{name}" holding cards "{cards}""#)]
fn board_with_column(
    world: &mut BoardMoveWorld,
    name: String,
    cards: String,
) -> Result<(), eyre::Report> {
    let store = world.store()?;
    let column = run_async(store.add_column(AddColumnRequest::new(name.clone())))
        .wrap_err("add scenario column")?;
    let mut created = Vec::new();
    for title in titles(&cards) {
        let card = run_async(store.add_card(AddCardRequest::new(column.id(), title.clone())))
            .wrap_err("add scenario card")?;
        created.push((title, card.id()));
    }
    world.columns.insert(name, column.id());
    world.cards.extend(created);
    Ok(())
}

#[given(r#"an empty column "{name}" with WIP limit {limit:u32}"#)]
fn empty_limited_column(
    world: &mut BoardMoveWorld,
    name: String,
    limit: u32,
) -> Result<(), eyre::Report> {
    let store = world.store()?;
    let column = run_async(
        store.add_column(
            AddColumnRequest::new(name.clone())
                .with_wip_limit(limit)
                .terminal(),
        ),
    )
    .wrap_err("add limited scenario column")?;
    world.columns.insert(name, column.id());
    Ok(())
}

#[given(r#"card "{card}" has been moved to column "{column}" at position {position:usize}"#)]
fn card_has_been_moved(
    world: &mut BoardMoveWorld,
    card: String,
    column: String,
    position: usize,
) -> Result<(), eyre::Report> {
    let request = MoveCard::new(world.card(&card)?, world.column(&column)?, position);
    let store = world.store()?;
    run_async(store.apply_move(request)).wrap_err("move card in scenario setup")?;
    Ok(())
}

#[given("the next board write fails to save")]
fn next_write_fails(world: &mut BoardMoveWorld) -> Result<(), eyre::Report> {
    world
        .repository
        .fail_next_writes(1)
        .wrap_err("arm injected failure")?;
    Ok(())
}
