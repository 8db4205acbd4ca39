//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use slotboard::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::ColumnId,
    services::BoardStore,
};
use slotboard::config::BoardConfig;
use slotboard::tenant::TenantId;

/// Board store type used across in-memory tests.
pub type TestBoardStore = BoardStore<InMemoryBoardRepository, DefaultClock>;

/// Opens a store over a shared repository.
///
/// # Errors
///
/// Returns an error if the stored board cannot be loaded.
pub async fn open_store(
    repository: &Arc<InMemoryBoardRepository>,
    tenant_id: TenantId,
    config: BoardConfig,
) -> Result<TestBoardStore, eyre::Report> {
    Ok(BoardStore::load(tenant_id, Arc::clone(repository), Arc::new(DefaultClock), config).await?)
}

/// Returns the card titles of a column in position order.
///
/// # Errors
///
/// Returns an error if the column is unknown.
pub fn card_titles(store: &TestBoardStore, column_id: ColumnId) -> Result<Vec<String>, eyre::Report> {
    Ok(store
        .list_cards(column_id)?
        .iter()
        .map(|card| card.title().as_str().to_owned())
        .collect())
}
