//! Tombstones Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};
use tracing::debug;

use crate::domain::{
    entities::EntityKind,
    tombstones::{
        records::{TombstoneId, TombstoneRecord},
        snapshot::SnapshotEnvelope,
    },
};

const CREATE_TOMBSTONE_SQL: &str = include_str!("sql/create_tombstone.sql");
const FIND_TOMBSTONES_SQL: &str = include_str!("sql/find_tombstones.sql");
const DELETE_TOMBSTONE_SQL: &str = include_str!("sql/delete_tombstone.sql");
const LIST_TOMBSTONES_SQL: &str = include_str!("sql/list_tombstones.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTombstonesRepository;

impl PgTombstonesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Persist `envelope`. Callers must remove the live row in the same transaction.
    #[tracing::instrument(
        name = "tombstones.repository.create_tombstone",
        skip(self, tx, envelope),
        fields(
            type_tag = %envelope.type_tag,
            entity_id = envelope.entity_id
        ),
        err
    )]
    pub(crate) async fn create_tombstone(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        envelope: &SnapshotEnvelope,
    ) -> Result<TombstoneRecord, sqlx::Error> {
        let tombstone = query_as::<Postgres, TombstoneRecord>(CREATE_TOMBSTONE_SQL)
            .bind(envelope.type_tag.as_str())
            .bind(envelope.entity_id)
            .bind(Json(envelope))
            .fetch_one(&mut **tx)
            .await?;

        debug!(tombstone_id = %tombstone.id, "created tombstone");

        Ok(tombstone)
    }

    /// Lock and return every tombstone for the key, newest first.
    #[tracing::instrument(
        name = "tombstones.repository.find_tombstones",
        skip(self, tx),
        fields(type_tag = %kind, match_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn find_tombstones(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: EntityKind,
        entity_id: i64,
    ) -> Result<Vec<TombstoneRecord>, sqlx::Error> {
        let tombstones = query_as::<Postgres, TombstoneRecord>(FIND_TOMBSTONES_SQL)
            .bind(kind.as_str())
            .bind(entity_id)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("match_count", tombstones.len());

        Ok(tombstones)
    }

    #[tracing::instrument(name = "tombstones.repository.delete_tombstone", skip(self, tx), err)]
    pub(crate) async fn delete_tombstone(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tombstone: TombstoneId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_TOMBSTONE_SQL)
            .bind(tombstone.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_tombstones(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: EntityKind,
    ) -> Result<Vec<TombstoneRecord>, sqlx::Error> {
        query_as::<Postgres, TombstoneRecord>(LIST_TOMBSTONES_SQL)
            .bind(kind.as_str())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TombstoneRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind = row
            .try_get::<String, _>("type_tag")?
            .parse::<EntityKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "type_tag".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: TombstoneId::from_i64(row.try_get("id")?),
            kind,
            entity_id: row.try_get("entity_id")?,
            payload: row
                .try_get::<Json<SnapshotEnvelope>, _>("payload")?
                .0,
            deleted_at: row.try_get::<SqlxTimestamp, _>("deleted_at")?.to_jiff(),
        })
    }
}
