//! In-memory integration tests for board stores sharing one repository.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rstest::rstest;
use slotboard::board::{
    adapters::memory::{InMemoryBoardRepository, RecordingBoardObserver},
    domain::{BoardChange, Card, CardId, CardPriority, Column, ColumnId, MoveCard},
    ports::BoardRepository,
    services::{AddCardRequest, AddColumnRequest, BoardErrorKind, BoardStoreError},
};
use slotboard::config::BoardConfig;
use slotboard::tenant::TenantId;

use super::helpers::{TestBoardStore, card_titles, open_store};

async fn seeded_board(
    repository: &Arc<InMemoryBoardRepository>,
    tenant_id: TenantId,
) -> Result<TestBoardStore, eyre::Report> {
    let mut store = open_store(repository, tenant_id, BoardConfig::strict()).await?;
    let backlog = store.add_column(AddColumnRequest::new("Backlog")).await?;
    store
        .add_column(AddColumnRequest::new("Done").with_wip_limit(3).terminal())
        .await?;
    for title in ["Call supplier", "Confirm bookings", "Restock"] {
        store
            .add_card(AddCardRequest::new(backlog.id(), title))
            .await?;
    }
    Ok(store)
}

/// Seeded column and card identifiers, in board order.
struct Layout {
    backlog: ColumnId,
    done: ColumnId,
    call: CardId,
    confirm: CardId,
    restock: CardId,
}

fn layout(store: &TestBoardStore) -> Result<Layout, eyre::Report> {
    let columns: Vec<_> = store.list_columns().iter().map(Column::id).collect();
    let (backlog, done) = match columns.as_slice() {
        [backlog, done] => (*backlog, *done),
        other => return Err(eyre::eyre!("unexpected columns {other:?}")),
    };
    let cards: Vec<_> = store.list_cards(backlog)?.iter().map(Card::id).collect();
    let (call, confirm, restock) = match cards.as_slice() {
        [call, confirm, restock] => (*call, *confirm, *restock),
        other => return Err(eyre::eyre!("unexpected cards {other:?}")),
    };
    Ok(Layout {
        backlog,
        done,
        call,
        confirm,
        restock,
    })
}

/// Checks that a freshly loaded session sees `backlog` and `done` in that
/// column order, holding exactly the given titles at dense positions.
async fn assert_stored(
    repository: &Arc<InMemoryBoardRepository>,
    tenant_id: TenantId,
    layout: &Layout,
    backlog: &[&str],
    done: &[&str],
) -> Result<(), eyre::Report> {
    let fresh = open_store(repository, tenant_id, BoardConfig::strict()).await?;
    let order: Vec<_> = fresh.list_columns().iter().map(Column::id).collect();
    eyre::ensure!(
        order == [layout.backlog, layout.done],
        "stored column order changed: {order:?}"
    );
    eyre::ensure!(
        card_titles(&fresh, layout.backlog)? == backlog,
        "stored backlog is {:?}",
        card_titles(&fresh, layout.backlog)?
    );
    eyre::ensure!(
        card_titles(&fresh, layout.done)? == done,
        "stored done column is {:?}",
        card_titles(&fresh, layout.done)?
    );
    let snapshot = repository.load_board(tenant_id).await?;
    for column_id in [layout.backlog, layout.done] {
        let mut positions: Vec<usize> = snapshot
            .cards
            .iter()
            .filter(|card| card.column_id() == column_id)
            .map(Card::position)
            .collect();
        positions.sort_unstable();
        eyre::ensure!(
            positions.iter().copied().eq(0..positions.len()),
            "stored positions in {column_id} are not dense: {positions:?}"
        );
    }
    Ok(())
}

fn expect_conflict<T: std::fmt::Debug>(
    result: Result<T, BoardStoreError>,
    action: &str,
) -> Result<(), eyre::Report> {
    match result {
        Err(err) if err.kind() == BoardErrorKind::Conflict => Ok(()),
        other => Err(eyre::eyre!("{action} should conflict, got {other:?}")),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moves_are_visible_to_a_fresh_session() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut first = seeded_board(&repository, tenant_id).await?;
    let Layout {
        backlog,
        done,
        restock,
        ..
    } = layout(&first)?;

    first.apply_move(MoveCard::new(restock, done, 0)).await?;
    first
        .apply_move(MoveCard::new(restock, backlog, 0))
        .await?;

    let second = open_store(&repository, tenant_id, BoardConfig::strict()).await?;
    eyre::ensure!(
        card_titles(&second, backlog)?
            == ["Restock", "Call supplier", "Confirm bookings"],
        "second session sees a different order"
    );
    eyre::ensure!(
        second.board() == first.board(),
        "sessions disagree about the board"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_session_reloads_and_retries() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut first = seeded_board(&repository, tenant_id).await?;
    let mut second = open_store(&repository, tenant_id, BoardConfig::strict()).await?;
    let Layout {
        done,
        call,
        confirm,
        ..
    } = layout(&first)?;

    first.apply_move(MoveCard::new(call, done, 0)).await?;
    let stale = second
        .apply_move(MoveCard::new(confirm, done, 0))
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("stale session write was accepted"))?;
    eyre::ensure!(stale.kind() == BoardErrorKind::Conflict, "got {stale:?}");

    second.reload().await?;
    second.apply_move(MoveCard::new(confirm, done, 0)).await?;
    first.reload().await?;
    eyre::ensure!(
        card_titles(&first, done)? == ["Confirm bookings", "Call supplier"],
        "retry did not land"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn observers_hear_each_persisted_change() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut store = open_store(&repository, tenant_id, BoardConfig::strict()).await?;
    let observer = RecordingBoardObserver::new();
    store.subscribe(Arc::new(observer.clone()));

    let column = store.add_column(AddColumnRequest::new("Today")).await?;
    let card = store
        .add_card(AddCardRequest::new(column.id(), "Open studio"))
        .await?;
    store.remove_card(card.id()).await?;
    store.reload().await?;

    let changes = observer.changes();
    eyre::ensure!(changes.len() == 4, "unexpected changes {changes:?}");
    eyre::ensure!(
        matches!(changes.first(), Some(BoardChange::ColumnAdded { column_id }) if *column_id == column.id()),
        "first change was {:?}",
        changes.first()
    );
    eyre::ensure!(
        matches!(changes.last(), Some(BoardChange::Reloaded { tenant_id: id }) if *id == tenant_id),
        "last change was {:?}",
        changes.last()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_reflect_priorities_and_due_dates() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let mut store = open_store(&repository, TenantId::new(), BoardConfig::lenient()).await?;
    let column = store.add_column(AddColumnRequest::new("Doing")).await?;
    store
        .add_card(
            AddCardRequest::new(column.id(), "Late invoice")
                .with_priority(CardPriority::Urgent)
                .with_due_at(Utc::now() - Duration::hours(2)),
        )
        .await?;
    store
        .add_card(AddCardRequest::new(column.id(), "Plan week").with_priority(CardPriority::Low))
        .await?;

    let stats = store.stats();
    let doing = stats
        .first()
        .ok_or_else(|| eyre::eyre!("missing stats"))?;
    eyre::ensure!(doing.card_count == 2, "card count {}", doing.card_count);
    eyre::ensure!(
        doing.high_priority_count == 1,
        "high priority {}",
        doing.high_priority_count
    );
    eyre::ensure!(doing.overdue_count == 1, "overdue {}", doing.overdue_count);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_column_reorder_cannot_pull_a_card_back() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut first = seeded_board(&repository, tenant_id).await?;
    let mut second = open_store(&repository, tenant_id, BoardConfig::strict()).await?;
    let ids = layout(&first)?;
    let stale_view = second.board().clone();

    first
        .apply_move(MoveCard::new(ids.restock, ids.done, 0))
        .await?;
    expect_conflict(
        second.move_column(ids.backlog, 1).await,
        "stale column reorder",
    )?;
    eyre::ensure!(second.board() == &stale_view, "stale session kept its reorder");
    expect_conflict(
        second
            .apply_move(MoveCard::new(ids.call, ids.backlog, 2))
            .await,
        "stale card reorder",
    )?;

    assert_stored(
        &repository,
        tenant_id,
        &ids,
        &["Call supplier", "Confirm bookings"],
        &["Restock"],
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_card_removal_leaves_storage_untouched() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut first = seeded_board(&repository, tenant_id).await?;
    let mut second = open_store(&repository, tenant_id, BoardConfig::strict()).await?;
    let ids = layout(&first)?;
    let stale_view = second.board().clone();

    first
        .apply_move(MoveCard::new(ids.restock, ids.done, 0))
        .await?;
    expect_conflict(second.remove_card(ids.call).await, "stale card removal")?;

    eyre::ensure!(second.board() == &stale_view, "stale session kept its removal");
    assert_stored(
        &repository,
        tenant_id,
        &ids,
        &["Call supplier", "Confirm bookings"],
        &["Restock"],
    )
    .await?;

    second.reload().await?;
    second.remove_card(ids.call).await?;
    assert_stored(
        &repository,
        tenant_id,
        &ids,
        &["Confirm bookings"],
        &["Restock"],
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_card_addition_is_rejected() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut first = seeded_board(&repository, tenant_id).await?;
    let mut second = open_store(&repository, tenant_id, BoardConfig::strict()).await?;
    let ids = layout(&first)?;
    let stale_view = second.board().clone();

    first.remove_card(ids.confirm).await?;
    expect_conflict(
        second
            .add_card(AddCardRequest::new(ids.backlog, "Order labels"))
            .await,
        "stale card addition",
    )?;

    eyre::ensure!(second.board() == &stale_view, "stale session kept its card");
    assert_stored(
        &repository,
        tenant_id,
        &ids,
        &["Call supplier", "Restock"],
        &[],
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_column_removal_keeps_the_column() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut first = seeded_board(&repository, tenant_id).await?;
    let mut second = open_store(&repository, tenant_id, BoardConfig::strict()).await?;
    let ids = layout(&first)?;
    let stale_view = second.board().clone();

    first
        .apply_move(MoveCard::new(ids.restock, ids.done, 0))
        .await?;
    expect_conflict(
        second.remove_column(ids.done).await,
        "stale column removal",
    )?;

    eyre::ensure!(second.board() == &stale_view, "stale session dropped the column");
    assert_stored(
        &repository,
        tenant_id,
        &ids,
        &["Call supplier", "Confirm bookings"],
        &["Restock"],
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_holding_cards_survives_last_write_wins_removal() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let mut first = seeded_board(&repository, tenant_id).await?;
    let mut second = open_store(&repository, tenant_id, BoardConfig::lenient()).await?;
    let ids = layout(&first)?;

    first
        .apply_move(MoveCard::new(ids.restock, ids.done, 0))
        .await?;
    expect_conflict(
        second.remove_column(ids.done).await,
        "removal of a column that holds cards",
    )?;

    assert_stored(
        &repository,
        tenant_id,
        &ids,
        &["Call supplier", "Confirm bookings"],
        &["Restock"],
    )
    .await
}
