//! Shared world state for board move BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use slotboard::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{CardId, ColumnId, MoveOutcome},
    services::{BoardStore, BoardStoreError},
};
use slotboard::config::BoardConfig;
use slotboard::tenant::TenantId;

/// Store type used by the BDD world.
pub type TestBoardStore = BoardStore<InMemoryBoardRepository, DefaultClock>;

/// Scenario world for board move behaviour tests.
pub struct BoardMoveWorld {
    pub repository: Arc<InMemoryBoardRepository>,
    pub store: Option<TestBoardStore>,
    pub columns: HashMap<String, ColumnId>,
    pub cards: HashMap<String, CardId>,
    pub writes_before_move: usize,
    pub last_move: Option<Result<MoveOutcome, BoardStoreError>>,
}

impl BoardMoveWorld {
    /// Creates a world with an empty repository and no loaded board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryBoardRepository::new()),
            store: None,
            columns: HashMap::new(),
            cards: HashMap::new(),
            writes_before_move: 0,
            last_move: None,
        }
    }

    /// Loads the tenant board on first use and returns the store.
    pub fn store(&mut self) -> Result<&mut TestBoardStore, eyre::Report> {
        if self.store.is_none() {
            let store = run_async(BoardStore::load(
                TenantId::new(),
                Arc::clone(&self.repository),
                Arc::new(DefaultClock),
                BoardConfig::strict(),
            ))?;
            self.store = Some(store);
        }
        self.store
            .as_mut()
            .ok_or_else(|| eyre::eyre!("board store was not loaded"))
    }

    /// Resolves a column name used in the scenario.
    pub fn column(&self, name: &str) -> Result<ColumnId, eyre::Report> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown column in scenario: {name}"))
    }

    /// Resolves a card title used in the scenario.
    pub fn card(&self, title: &str) -> Result<CardId, eyre::Report> {
        self.cards
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown card in scenario: {title}"))
    }
}

impl Default for BoardMoveWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardMoveWorld {
    BoardMoveWorld::default()
}

/// Splits a comma-separated list of card titles, ignoring blanks.
pub fn titles(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
