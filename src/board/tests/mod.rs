//! Unit tests for the board domain and store.

mod store_tests;

use crate::board::domain::{
    Board, Card, CardId, CardPriority, CardTitle, Column, ColumnColor, ColumnId, ColumnName,
    WipLimit,
};
use crate::tenant::TenantId;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

/// Builds a column with the default color.
fn column(name: &str) -> Column {
    Column::new(
        ColumnName::new(name).expect("valid column name"),
        ColumnColor::default(),
    )
}

/// Builds a column with a WIP limit.
fn limited_column(name: &str, limit: u32) -> Column {
    column(name).with_wip_limit(WipLimit::new(limit).expect("valid WIP limit"))
}

/// Builds a medium-priority card for `column_id`.
fn card(column_id: ColumnId, title: &str) -> Card {
    Card::new(
        column_id,
        CardTitle::new(title).expect("valid card title"),
        CardPriority::Medium,
        &DefaultClock,
    )
}

fn now() -> DateTime<Utc> {
    DefaultClock.utc()
}

/// Adds one card per title to the end of `column_id`.
fn fill(board: &mut Board, column_id: ColumnId, titles: &[&str]) -> Vec<CardId> {
    titles
        .iter()
        .map(|title| {
            let (added, _) = board
                .add_card(card(column_id, title), now())
                .expect("card should be accepted");
            added.id()
        })
        .collect()
}

/// Returns card identifiers of a column in position order.
fn order(board: &Board, column_id: ColumnId) -> Vec<CardId> {
    board
        .cards_in(column_id)
        .expect("column should exist")
        .iter()
        .map(Card::id)
        .collect()
}

/// Asserts every column holds positions `0..n` in vector order.
fn assert_dense(board: &Board) {
    for column in board.columns() {
        let positions: Vec<usize> = board
            .cards_in(column.id())
            .expect("every column has a lane")
            .iter()
            .map(Card::position)
            .collect();
        let expected: Vec<usize> = (0..positions.len()).collect();
        assert_eq!(positions, expected, "column {} is not dense", column.name());
        for card in board.cards_in(column.id()).unwrap_or_default() {
            assert_eq!(card.column_id(), column.id());
        }
    }
    for (index, column) in board.columns().iter().enumerate() {
        assert_eq!(column.index(), index);
    }
}

/// Two-column board: `todo` holds a, b, c, d and `done` is empty.
struct TwoColumns {
    board: Board,
    todo: ColumnId,
    done: ColumnId,
    cards: Vec<CardId>,
}

fn two_columns() -> TwoColumns {
    let mut board = Board::new(TenantId::new());
    let todo = board
        .add_column(column("To do"))
        .expect("column should be added")
        .id();
    let done = board
        .add_column(column("Done"))
        .expect("column should be added")
        .id();
    let cards = fill(&mut board, todo, &["a", "b", "c", "d"]);
    TwoColumns {
        board,
        todo,
        done,
        cards,
    }
}
