//! Board store tests: persistence, rollback, concurrency and observers.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::board::{
    adapters::memory::{InMemoryBoardRepository, RecordingBoardObserver},
    domain::{
        BoardChange, Card, CardId, CardPriority, CardTitle, Column, ColumnColor, ColumnId,
        ColumnName, ColumnVersion, MoveCard, PersistedCardData, PersistedColumnData,
    },
    ports::{BoardObserver, BoardRepository},
    services::{AddCardRequest, AddColumnRequest, BoardErrorKind, BoardStore, BoardStoreError},
};
use crate::config::BoardConfig;
use crate::tenant::TenantId;
use mockable::DefaultClock;
use mockall::mock;
use rstest::rstest;

type TestStore = BoardStore<InMemoryBoardRepository, DefaultClock>;

mock! {
    Observer {}
    impl BoardObserver for Observer {
        fn board_changed(&self, change: &BoardChange);
    }
}

struct Seeded {
    repository: Arc<InMemoryBoardRepository>,
    store: TestStore,
    todo: ColumnId,
    done: ColumnId,
    cards: Vec<CardId>,
}

async fn open(
    repository: &Arc<InMemoryBoardRepository>,
    tenant_id: TenantId,
    config: BoardConfig,
) -> TestStore {
    BoardStore::load(
        tenant_id,
        Arc::clone(repository),
        Arc::new(DefaultClock),
        config,
    )
    .await
    .expect("board should load")
}

async fn seeded(config: BoardConfig) -> Seeded {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let mut store = open(&repository, TenantId::new(), config).await;
    let todo = store
        .add_column(AddColumnRequest::new("To do"))
        .await
        .expect("column should be added")
        .id();
    let done = store
        .add_column(AddColumnRequest::new("Done").with_wip_limit(2).terminal())
        .await
        .expect("column should be added")
        .id();
    let mut cards = Vec::new();
    for title in ["a", "b", "c"] {
        let card = store
            .add_card(AddCardRequest::new(todo, title))
            .await
            .expect("card should be added");
        cards.push(card.id());
    }
    Seeded {
        repository,
        store,
        todo,
        done,
        cards,
    }
}

fn first(cards: &[CardId]) -> CardId {
    *cards.first().expect("seeded cards")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn persisted_board_reloads_identically() {
    let Seeded {
        repository,
        mut store,
        done,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;
    store
        .apply_move(MoveCard::new(first(&cards), done, 0))
        .await
        .expect("move should succeed");

    let reopened = open(&repository, store.tenant_id(), BoardConfig::default()).await;

    assert_eq!(reopened.board(), store.board());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn noop_move_writes_and_notifies_nothing() {
    let Seeded {
        repository,
        mut store,
        todo,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;
    let observer = RecordingBoardObserver::new();
    store.subscribe(Arc::new(observer.clone()));
    let writes = repository.committed_writes().expect("counter");

    let outcome = store
        .apply_move(MoveCard::new(first(&cards), todo, 0))
        .await
        .expect("no-op should succeed");

    assert!(outcome.is_noop());
    assert_eq!(repository.committed_writes().expect("counter"), writes);
    assert!(observer.changes().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_persistence_rolls_back_the_move() {
    let Seeded {
        repository,
        mut store,
        done,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;
    let observer = RecordingBoardObserver::new();
    store.subscribe(Arc::new(observer.clone()));
    let before = store.board().clone();
    repository
        .fail_next_writes(1)
        .expect("failure injection");

    let err = store
        .apply_move(MoveCard::new(first(&cards), done, 0))
        .await
        .expect_err("persistence failure should surface");

    assert_eq!(err.kind(), BoardErrorKind::Persistence);
    assert_eq!(
        err.user_message(),
        "Could not save the board; your change was undone"
    );
    assert_eq!(store.board(), &before);
    assert!(observer.changes().is_empty());

    store.reload().await.expect("reload should succeed");
    assert_eq!(store.board(), &before);
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    AddCard,
    RemoveCard,
    AddColumn,
    MoveColumn,
    RemoveColumn,
}

async fn attempt(mutation: Mutation, seeded: &mut Seeded) -> Result<(), BoardStoreError> {
    let store = &mut seeded.store;
    match mutation {
        Mutation::AddCard => store
            .add_card(AddCardRequest::new(seeded.todo, "lost"))
            .await
            .map(drop),
        Mutation::RemoveCard => store.remove_card(first(&seeded.cards)).await.map(drop),
        Mutation::AddColumn => store
            .add_column(AddColumnRequest::new("Review"))
            .await
            .map(drop),
        Mutation::MoveColumn => store.move_column(seeded.done, 0).await,
        Mutation::RemoveColumn => store.remove_column(seeded.done).await,
    }
}

#[rstest]
#[case(Mutation::AddCard)]
#[case(Mutation::RemoveCard)]
#[case(Mutation::AddColumn)]
#[case(Mutation::MoveColumn)]
#[case(Mutation::RemoveColumn)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_write_rolls_back_memory_and_storage(#[case] mutation: Mutation) {
    let mut seeded = seeded(BoardConfig::default()).await;
    let observer = RecordingBoardObserver::new();
    seeded.store.subscribe(Arc::new(observer.clone()));
    let before = seeded.store.board().clone();
    let writes = seeded.repository.committed_writes().expect("counter");
    seeded
        .repository
        .fail_next_writes(1)
        .expect("failure injection");

    let err = attempt(mutation, &mut seeded)
        .await
        .expect_err("persistence failure should surface");

    assert_eq!(err.kind(), BoardErrorKind::Persistence);
    assert_eq!(seeded.store.board(), &before);
    assert!(observer.changes().is_empty());
    assert_eq!(
        seeded.repository.committed_writes().expect("counter"),
        writes
    );
    let reopened = open(
        &seeded.repository,
        seeded.store.tenant_id(),
        BoardConfig::default(),
    )
    .await;
    assert_eq!(reopened.board(), &before);
}

#[rstest]
#[case(Mutation::AddCard)]
#[case(Mutation::RemoveCard)]
#[case(Mutation::AddColumn)]
#[case(Mutation::MoveColumn)]
#[case(Mutation::RemoveColumn)]
#[tokio::test(flavor = "multi_thread")]
async fn each_mutation_is_one_write(#[case] mutation: Mutation) {
    let mut seeded = seeded(BoardConfig::default()).await;
    let writes = seeded.repository.committed_writes().expect("counter");

    attempt(mutation, &mut seeded)
        .await
        .expect("mutation should succeed");

    assert_eq!(
        seeded.repository.committed_writes().expect("counter"),
        writes + 1
    );
    let reopened = open(
        &seeded.repository,
        seeded.store.tenant_id(),
        BoardConfig::default(),
    )
    .await;
    assert_eq!(reopened.board(), seeded.store.board());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_session_is_rejected_when_versions_are_checked() {
    let Seeded {
        repository,
        mut store,
        done,
        cards,
        ..
    } = seeded(BoardConfig::strict()).await;
    let mut other = open(&repository, store.tenant_id(), BoardConfig::strict()).await;
    let second = *cards.get(1).expect("seeded cards");

    store
        .apply_move(MoveCard::new(first(&cards), done, 0))
        .await
        .expect("first session move should succeed");
    let stale_view = other.board().clone();
    let err = other
        .apply_move(MoveCard::new(second, done, 0))
        .await
        .expect_err("stale session should conflict");

    assert_eq!(err.kind(), BoardErrorKind::Conflict);
    assert_eq!(
        err.user_message(),
        "The board changed in another session; reload and try again"
    );
    assert_eq!(other.board(), &stale_view);

    other.reload().await.expect("reload should succeed");
    other
        .apply_move(MoveCard::new(second, done, 0))
        .await
        .expect("move after reload should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_session_wins_under_last_write_wins() {
    let Seeded {
        repository,
        mut store,
        done,
        cards,
        ..
    } = seeded(BoardConfig::lenient()).await;
    let mut other = open(&repository, store.tenant_id(), BoardConfig::lenient()).await;
    let second = *cards.get(1).expect("seeded cards");

    store
        .apply_move(MoveCard::new(first(&cards), done, 0))
        .await
        .expect("first session move should succeed");
    other
        .apply_move(MoveCard::new(second, done, 0))
        .await
        .expect("last write wins");

    let stored = repository
        .load_board(store.tenant_id())
        .await
        .expect("board should load");
    let placed = stored
        .cards
        .iter()
        .find(|card| card.id() == second)
        .expect("card is stored");
    assert_eq!(placed.column_id(), done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_column_reports_wip_limit() {
    let Seeded {
        mut store,
        done,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;
    for card_id in cards.iter().take(2) {
        store
            .apply_move(MoveCard::new(*card_id, done, 0))
            .await
            .expect("move should succeed");
    }
    let third = *cards.get(2).expect("seeded cards");
    let before = store.board().clone();

    let err = store
        .apply_move(MoveCard::new(third, done, 0))
        .await
        .expect_err("column is full");

    assert_eq!(err.kind(), BoardErrorKind::WipLimitExceeded);
    assert_eq!(err.user_message(), "WIP limit reached (2)");
    assert_eq!(store.board(), &before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_into_terminal_column_completes_card() {
    let Seeded {
        mut store,
        todo,
        done,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;
    let card_id = first(&cards);

    store
        .apply_move(MoveCard::new(card_id, done, 0))
        .await
        .expect("move should succeed");
    assert!(
        store
            .find_card(card_id)
            .and_then(Card::completed_at)
            .is_some()
    );

    store
        .apply_move(MoveCard::new(card_id, todo, 0))
        .await
        .expect("move back should succeed");
    assert!(
        store
            .find_card(card_id)
            .and_then(Card::completed_at)
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn observer_hears_each_move_once() {
    let Seeded {
        mut store,
        todo,
        done,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;
    let card_id = first(&cards);
    let mut observer = MockObserver::new();
    observer
        .expect_board_changed()
        .withf(move |change| {
            matches!(
                change,
                BoardChange::CardMoved { card_id: moved, from, to }
                    if *moved == card_id && from.column_id == todo && to.column_id == done
            )
        })
        .times(1)
        .return_const(());
    store.subscribe(Arc::new(observer));

    store
        .apply_move(MoveCard::new(card_id, done, 0))
        .await
        .expect("move should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unsubscribed_observer_is_not_notified() {
    let Seeded {
        mut store,
        done,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;
    let observer = RecordingBoardObserver::new();
    let subscription = store.subscribe(Arc::new(observer.clone()));

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store
        .apply_move(MoveCard::new(first(&cards), done, 0))
        .await
        .expect("move should succeed");

    assert!(observer.changes().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closure_observers_receive_changes() {
    let Seeded {
        mut store, todo, ..
    } = seeded(BoardConfig::default()).await;
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    store.subscribe(Arc::new(move |_: &BoardChange| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    store
        .add_card(AddCardRequest::new(todo, "d").with_priority(CardPriority::Urgent))
        .await
        .expect("card should be added");
    store.reload().await.expect("reload should succeed");

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_card_persists_closed_gap() {
    let Seeded {
        repository,
        mut store,
        todo,
        cards,
        ..
    } = seeded(BoardConfig::default()).await;

    let removed = store
        .remove_card(first(&cards))
        .await
        .expect("card should be removed");

    assert_eq!(removed.id(), first(&cards));
    let reopened = open(&repository, store.tenant_id(), BoardConfig::default()).await;
    let positions: Vec<usize> = reopened
        .list_cards(todo)
        .expect("column exists")
        .iter()
        .map(Card::position)
        .collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(reopened.board(), store.board());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_empty_column_removal_explains_itself() {
    let Seeded {
        mut store, todo, ..
    } = seeded(BoardConfig::default()).await;

    let err = store
        .remove_column(todo)
        .await
        .expect_err("column still holds cards");

    assert_eq!(err.kind(), BoardErrorKind::Invalid);
    assert_eq!(
        err.user_message(),
        "Move or remove the 3 cards in this column first"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_reorder_is_persisted() {
    let Seeded {
        repository,
        mut store,
        todo,
        done,
        ..
    } = seeded(BoardConfig::default()).await;

    store
        .move_column(done, 0)
        .await
        .expect("column should move");

    let reopened = open(&repository, store.tenant_id(), BoardConfig::default()).await;
    let order: Vec<ColumnId> = reopened.list_columns().iter().map(Column::id).collect();
    assert_eq!(order, vec![done, todo]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_requests_are_rejected_before_storage() {
    let Seeded {
        mut store, todo, ..
    } = seeded(BoardConfig::default()).await;

    let bad_color = store
        .add_column(AddColumnRequest::new("Review").with_color("teal"))
        .await
        .expect_err("color is invalid");
    let bad_title = store
        .add_card(AddCardRequest::new(todo, "  "))
        .await
        .expect_err("title is blank");
    let unknown = store
        .list_cards(ColumnId::new())
        .map(<[Card]>::len)
        .expect_err("column is unknown");

    assert_eq!(bad_color.kind(), BoardErrorKind::Invalid);
    assert_eq!(bad_title.kind(), BoardErrorKind::Invalid);
    assert_eq!(unknown.kind(), BoardErrorKind::NotFound);
    assert_eq!(store.list_columns().len(), 2);
}

#[rstest]
#[case(BoardConfig::strict(), true)]
#[case(BoardConfig::lenient(), false)]
#[tokio::test(flavor = "multi_thread")]
async fn load_repairs_follow_configuration(
    #[case] config: BoardConfig,
    #[case] persisted: bool,
) {
    let repository = Arc::new(InMemoryBoardRepository::new());
    let tenant_id = TenantId::new();
    let column = Column::from_persisted(PersistedColumnData {
        id: ColumnId::new(),
        name: ColumnName::new("Inbox").expect("valid name"),
        color: ColumnColor::default(),
        index: 0,
        wip_limit: None,
        terminal: false,
        version: ColumnVersion::INITIAL,
    });
    repository
        .save_column(tenant_id, &column)
        .await
        .expect("column stored");
    for position in [3_usize, 9] {
        let card = Card::from_persisted(PersistedCardData {
            id: CardId::new(),
            column_id: column.id(),
            title: CardTitle::new("sparse").expect("valid title"),
            description: None,
            priority: CardPriority::Low,
            position,
            due_at: None,
            completed_at: None,
            created_at: mockable::Clock::utc(&DefaultClock),
        });
        repository
            .save_card(tenant_id, &card)
            .await
            .expect("card stored");
    }

    let store = open(&repository, tenant_id, config).await;

    let loaded: Vec<usize> = store
        .list_cards(column.id())
        .expect("column exists")
        .iter()
        .map(Card::position)
        .collect();
    assert_eq!(loaded, vec![0, 1]);
    let stored = repository
        .load_board(tenant_id)
        .await
        .expect("board should load");
    let mut positions: Vec<usize> = stored.cards.iter().map(Card::position).collect();
    positions.sort_unstable();
    let expected = if persisted { vec![0, 1] } else { vec![3, 9] };
    assert_eq!(positions, expected);
}
