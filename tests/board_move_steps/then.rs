//! Then steps for board move BDD scenarios.

use super::world::{BoardMoveWorld, titles};
use eyre::WrapErr;
use rstest_bdd_macros::then;

#[then(r#"column "{column}" lists cards "{cards}""#)]
fn column_lists_cards(
    world: &mut BoardMoveWorld,
    column: String,
    cards: String,
) -> Result<(), eyre::Report> {
    let column_id = world.column(&column)?;
    let store = world.store()?;
    let listed: Vec<String> = store
        .list_cards(column_id)
        .wrap_err("list scenario column")?
        .iter()
        .map(|card| card.title().as_str().to_owned())
        .collect();
    let expected = titles(&cards);
    if listed != expected {
        return Err(eyre::eyre!(
            "column {column}: expected {expected:?}, found {listed:?}"
        ));
    }
    Ok(())
}

#[then(r#"the move fails with "{message}""#)]
fn move_fails_with(world: &BoardMoveWorld, message: String) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;
    match result {
        Err(err) if err.user_message() == message => Ok(()),
        Err(err) => Err(eyre::eyre!(
            "expected message {message:?}, got {:?}",
            err.user_message()
        )),
        Ok(outcome) => Err(eyre::eyre!("expected failure, move succeeded: {outcome:?}")),
    }
}

#[then(r#"card "{card}" is completed"#)]
fn card_is_completed(world: &mut BoardMoveWorld, card: String) -> Result<(), eyre::Report> {
    let card_id = world.card(&card)?;
    let store = world.store()?;
    let found = store
        .find_card(card_id)
        .ok_or_else(|| eyre::eyre!("card {card} is missing"))?;
    if found.completed_at().is_none() {
        return Err(eyre::eyre!("card {card} is not completed"));
    }
    Ok(())
}

#[then("the move was persisted")]
fn move_was_persisted(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    let writes = world
        .repository
        .committed_writes()
        .wrap_err("count committed writes")?;
    if writes != world.writes_before_move + 1 {
        return Err(eyre::eyre!(
            "expected one new write, found {}",
            writes.saturating_sub(world.writes_before_move)
        ));
    }
    Ok(())
}

#[then("nothing was persisted")]
fn nothing_was_persisted(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    let writes = world
        .repository
        .committed_writes()
        .wrap_err("count committed writes")?;
    if writes != world.writes_before_move {
        return Err(eyre::eyre!("a no-op move committed {writes} writes"));
    }
    Ok(())
}

#[then(r#"column "{column}" is empty"#)]
fn column_is_empty(world: &mut BoardMoveWorld, column: String) -> Result<(), eyre::Report> {
    let column_id = world.column(&column)?;
    let store = world.store()?;
    let count = store
        .list_cards(column_id)
        .wrap_err("list scenario column")?
        .len();
    if count != 0 {
        return Err(eyre::eyre!("column {column} holds {count} cards"));
    }
    Ok(())
}
