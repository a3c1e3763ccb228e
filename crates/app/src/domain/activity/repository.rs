//! Activity Log Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use tracing::debug;

use crate::domain::{
    accounts::records::AccountId,
    activity::records::{ActivityLogEntry, ActivityLogEntryId},
};

const APPEND_ENTRY_SQL: &str = include_str!("sql/append_entry.sql");

#[cfg(test)]
const LIST_ENTRIES_SQL: &str = include_str!("sql/list_entries.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgActivityLogRepository;

impl PgActivityLogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "activity.repository.append",
        skip(self, tx, action),
        fields(actor = ?actor),
        err
    )]
    pub(crate) async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Option<AccountId>,
        action: &str,
    ) -> Result<ActivityLogEntry, sqlx::Error> {
        let entry = query_as::<Postgres, ActivityLogEntry>(APPEND_ENTRY_SQL)
            .bind(actor.map(AccountId::into_i64))
            .bind(action)
            .fetch_one(&mut **tx)
            .await?;

        debug!(entry_id = %entry.id, action, "appended activity log entry");

        Ok(entry)
    }

    #[cfg(test)]
    pub(crate) async fn list_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ActivityLogEntry>, sqlx::Error> {
        query_as::<Postgres, ActivityLogEntry>(LIST_ENTRIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ActivityLogEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ActivityLogEntryId::from_i64(row.try_get("id")?),
            actor: row
                .try_get::<Option<i64>, _>("actor_id")?
                .map(AccountId::from_i64),
            action: row.try_get("action")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
