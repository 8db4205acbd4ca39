//! `PostgreSQL` repository implementation for board storage.

use super::{
    models::{CardRow, ColumnRow},
    schema::{board_cards, board_columns},
};
use crate::board::{
    domain::{
        BoardSnapshot, Card, CardId, CardPlacement, CardPriority, CardTitle, Column, ColumnColor,
        ColumnId, ColumnName, ColumnVersion, ColumnVersionClaim, PersistedCardData,
        PersistedColumnData, WipLimit,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, BoardWrite},
};
use crate::tenant::TenantId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

impl From<DieselError> for BoardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn load_board(&self, tenant_id: TenantId) -> BoardRepositoryResult<BoardSnapshot> {
        self.run_blocking(move |connection| {
            let tenant = tenant_id.into_inner();
            let column_rows = board_columns::table
                .filter(board_columns::tenant_id.eq(tenant))
                .order((board_columns::ordinal.asc(), board_columns::id.asc()))
                .select(ColumnRow::as_select())
                .load::<ColumnRow>(connection)?;
            let card_rows = board_cards::table
                .filter(board_cards::tenant_id.eq(tenant))
                .order((
                    board_cards::column_id.asc(),
                    board_cards::position.asc(),
                    board_cards::id.asc(),
                ))
                .select(CardRow::as_select())
                .load::<CardRow>(connection)?;

            Ok(BoardSnapshot {
                tenant_id,
                columns: column_rows
                    .into_iter()
                    .map(row_to_column)
                    .collect::<BoardRepositoryResult<_>>()?,
                cards: card_rows
                    .into_iter()
                    .map(row_to_card)
                    .collect::<BoardRepositoryResult<_>>()?,
            })
        })
        .await
    }

    async fn apply_write(
        &self,
        tenant_id: TenantId,
        write: &BoardWrite,
    ) -> BoardRepositoryResult<()> {
        let column_rows = write
            .columns
            .iter()
            .map(|column| column_to_row(tenant_id, column))
            .collect::<BoardRepositoryResult<Vec<_>>>()?;
        let card_rows = write
            .cards
            .iter()
            .map(|card| card_to_row(tenant_id, card))
            .collect::<BoardRepositoryResult<Vec<_>>>()?;
        let write = write.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<(), BoardRepositoryError, _>(|tx| {
                for row in &column_rows {
                    upsert_column(tx, row)?;
                }
                for claim in &write.claims {
                    apply_claim(tx, tenant_id, *claim)?;
                }
                for card_id in &write.deleted_cards {
                    delete_card(tx, tenant_id, *card_id)?;
                }
                for column_id in &write.deleted_columns {
                    delete_column(tx, tenant_id, *column_id)?;
                }
                for row in &card_rows {
                    upsert_card(tx, row)?;
                }
                for placement in &write.placements {
                    apply_placement(tx, tenant_id, *placement)?;
                }
                Ok(())
            })
        })
        .await
    }
}

/// Updates a column's layout or inserts it when it is not stored yet.
///
/// The stored version is never overwritten; only claims move it.
fn upsert_column(connection: &mut PgConnection, row: &ColumnRow) -> BoardRepositoryResult<()> {
    let updated = diesel::update(
        board_columns::table
            .filter(board_columns::id.eq(row.id))
            .filter(board_columns::tenant_id.eq(row.tenant_id)),
    )
    .set((
        board_columns::name.eq(&row.name),
        board_columns::color.eq(&row.color),
        board_columns::ordinal.eq(row.ordinal),
        board_columns::wip_limit.eq(row.wip_limit),
        board_columns::is_terminal.eq(row.is_terminal),
    ))
    .execute(connection)?;
    if updated == 0 {
        diesel::insert_into(board_columns::table)
            .values(row)
            .execute(connection)?;
    }
    Ok(())
}

/// Replaces a tenant's card or inserts it when it is not stored yet.
fn upsert_card(connection: &mut PgConnection, row: &CardRow) -> BoardRepositoryResult<()> {
    let column_id = ColumnId::from_uuid(row.column_id);
    let column_exists = board_columns::table
        .filter(board_columns::id.eq(row.column_id))
        .filter(board_columns::tenant_id.eq(row.tenant_id))
        .select(board_columns::id)
        .first::<uuid::Uuid>(connection)
        .optional()?
        .is_some();
    if !column_exists {
        return Err(BoardRepositoryError::ColumnNotFound(column_id));
    }

    let updated = diesel::update(
        board_cards::table
            .filter(board_cards::id.eq(row.id))
            .filter(board_cards::tenant_id.eq(row.tenant_id)),
    )
    .set((
        board_cards::column_id.eq(row.column_id),
        board_cards::title.eq(&row.title),
        board_cards::description.eq(&row.description),
        board_cards::priority.eq(&row.priority),
        board_cards::position.eq(row.position),
        board_cards::due_at.eq(row.due_at),
        board_cards::completed_at.eq(row.completed_at),
    ))
    .execute(connection)?;
    if updated == 0 {
        diesel::insert_into(board_cards::table)
            .values(row)
            .execute(connection)?;
    }
    Ok(())
}

fn delete_card(
    connection: &mut PgConnection,
    tenant_id: TenantId,
    card_id: CardId,
) -> BoardRepositoryResult<()> {
    let deleted = diesel::delete(
        board_cards::table
            .filter(board_cards::id.eq(card_id.into_inner()))
            .filter(board_cards::tenant_id.eq(tenant_id.into_inner())),
    )
    .execute(connection)?;
    if deleted == 0 {
        return Err(BoardRepositoryError::CardNotFound(card_id));
    }
    Ok(())
}

fn delete_column(
    connection: &mut PgConnection,
    tenant_id: TenantId,
    column_id: ColumnId,
) -> BoardRepositoryResult<()> {
    let remaining = board_cards::table
        .filter(board_cards::column_id.eq(column_id.into_inner()))
        .filter(board_cards::tenant_id.eq(tenant_id.into_inner()))
        .count()
        .get_result::<i64>(connection)?;
    if remaining > 0 {
        return Err(BoardRepositoryError::ColumnInUse(column_id));
    }

    let deleted = diesel::delete(
        board_columns::table
            .filter(board_columns::id.eq(column_id.into_inner()))
            .filter(board_columns::tenant_id.eq(tenant_id.into_inner())),
    )
    .execute(connection)?;
    if deleted == 0 {
        return Err(BoardRepositoryError::ColumnNotFound(column_id));
    }
    Ok(())
}

/// Compare-and-swaps one column version inside the current transaction.
fn apply_claim(
    connection: &mut PgConnection,
    tenant_id: TenantId,
    claim: ColumnVersionClaim,
) -> BoardRepositoryResult<()> {
    let expected = version_to_i64(claim.expected)?;
    let next = version_to_i64(claim.next)?;
    let column_filter = board_columns::table
        .filter(board_columns::id.eq(claim.column_id.into_inner()))
        .filter(board_columns::tenant_id.eq(tenant_id.into_inner()));

    let updated = diesel::update(column_filter.clone().filter(board_columns::version.eq(expected)))
        .set(board_columns::version.eq(next))
        .execute(connection)?;
    if updated > 0 {
        return Ok(());
    }

    let stored = column_filter
        .select(board_columns::version)
        .first::<i64>(connection)
        .optional()?;
    match stored {
        None => Err(BoardRepositoryError::ColumnNotFound(claim.column_id)),
        Some(stored) => Err(BoardRepositoryError::StaleColumn {
            column_id: claim.column_id,
            expected: claim.expected,
            stored: version_from_i64(stored)?,
        }),
    }
}

fn apply_placement(
    connection: &mut PgConnection,
    tenant_id: TenantId,
    placement: CardPlacement,
) -> BoardRepositoryResult<()> {
    let position = i32::try_from(placement.position).map_err(BoardRepositoryError::persistence)?;
    let updated = diesel::update(
        board_cards::table
            .filter(board_cards::id.eq(placement.card_id.into_inner()))
            .filter(board_cards::tenant_id.eq(tenant_id.into_inner())),
    )
    .set((
        board_cards::column_id.eq(placement.column_id.into_inner()),
        board_cards::position.eq(position),
        board_cards::completed_at.eq(placement.completed_at),
    ))
    .execute(connection)?;
    if updated == 0 {
        return Err(BoardRepositoryError::CardNotFound(placement.card_id));
    }
    Ok(())
}

fn version_to_i64(version: ColumnVersion) -> BoardRepositoryResult<i64> {
    i64::try_from(version.value()).map_err(BoardRepositoryError::persistence)
}

fn version_from_i64(value: i64) -> BoardRepositoryResult<ColumnVersion> {
    u64::try_from(value)
        .map(ColumnVersion::new)
        .map_err(BoardRepositoryError::persistence)
}

fn column_to_row(tenant_id: TenantId, column: &Column) -> BoardRepositoryResult<ColumnRow> {
    Ok(ColumnRow {
        id: column.id().into_inner(),
        tenant_id: tenant_id.into_inner(),
        name: column.name().as_str().to_owned(),
        color: column.color().as_str().to_owned(),
        ordinal: i32::try_from(column.index()).map_err(BoardRepositoryError::persistence)?,
        wip_limit: column
            .wip_limit()
            .map(|limit| i32::try_from(limit.value()).map_err(BoardRepositoryError::persistence))
            .transpose()?,
        is_terminal: column.is_terminal(),
        version: version_to_i64(column.version())?,
    })
}

fn row_to_column(row: ColumnRow) -> BoardRepositoryResult<Column> {
    let ColumnRow {
        id,
        tenant_id: _,
        name,
        color,
        ordinal,
        wip_limit,
        is_terminal,
        version,
    } = row;

    let wip_limit = wip_limit
        .map(|raw| {
            u32::try_from(raw)
                .map_err(BoardRepositoryError::persistence)
                .and_then(|value| WipLimit::new(value).map_err(BoardRepositoryError::persistence))
        })
        .transpose()?;

    Ok(Column::from_persisted(PersistedColumnData {
        id: ColumnId::from_uuid(id),
        name: ColumnName::new(name).map_err(BoardRepositoryError::persistence)?,
        color: ColumnColor::new(color).map_err(BoardRepositoryError::persistence)?,
        index: usize::try_from(ordinal).map_err(BoardRepositoryError::persistence)?,
        wip_limit,
        terminal: is_terminal,
        version: version_from_i64(version)?,
    }))
}

fn card_to_row(tenant_id: TenantId, card: &Card) -> BoardRepositoryResult<CardRow> {
    Ok(CardRow {
        id: card.id().into_inner(),
        tenant_id: tenant_id.into_inner(),
        column_id: card.column_id().into_inner(),
        title: card.title().as_str().to_owned(),
        description: card.description().map(str::to_owned),
        priority: card.priority().as_str().to_owned(),
        position: i32::try_from(card.position()).map_err(BoardRepositoryError::persistence)?,
        due_at: card.due_at(),
        completed_at: card.completed_at(),
        created_at: card.created_at(),
    })
}

fn row_to_card(row: CardRow) -> BoardRepositoryResult<Card> {
    let CardRow {
        id,
        tenant_id: _,
        column_id,
        title,
        description,
        priority,
        position,
        due_at,
        completed_at,
        created_at,
    } = row;

    Ok(Card::from_persisted(PersistedCardData {
        id: CardId::from_uuid(id),
        column_id: ColumnId::from_uuid(column_id),
        title: CardTitle::new(title).map_err(BoardRepositoryError::persistence)?,
        description,
        priority: CardPriority::try_from(priority.as_str())
            .map_err(BoardRepositoryError::persistence)?,
        position: usize::try_from(position).map_err(BoardRepositoryError::persistence)?,
        due_at,
        completed_at,
        created_at,
    }))
}
