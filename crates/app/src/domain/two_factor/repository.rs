//! One-Time Codes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use tracing::debug;

use crate::domain::{
    accounts::records::AccountId,
    two_factor::{
        OneTimeCode,
        records::{OneTimeCodeId, OneTimeCodeRecord},
    },
};

const CREATE_CODE_SQL: &str = include_str!("sql/create_code.sql");
const LATEST_CODE_SQL: &str = include_str!("sql/latest_code.sql");
const DELETE_CODE_SQL: &str = include_str!("sql/delete_code.sql");

#[cfg(test)]
const LIST_CODES_SQL: &str = include_str!("sql/list_codes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOneTimeCodesRepository;

impl PgOneTimeCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "two_factor.repository.create_code",
        skip(self, tx, code),
        fields(account_id = %account),
        err
    )]
    pub(crate) async fn create_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
        code: &OneTimeCode,
    ) -> Result<OneTimeCodeRecord, sqlx::Error> {
        let record = query_as::<Postgres, OneTimeCodeRecord>(CREATE_CODE_SQL)
            .bind(account.into_i64())
            .bind(code.as_str())
            .fetch_one(&mut **tx)
            .await?;

        debug!(code_id = %record.id, "stored one-time code");

        Ok(record)
    }

    /// Most recently issued code for the account, locked for the rest of the
    /// transaction.
    #[tracing::instrument(
        name = "two_factor.repository.latest_code",
        skip(self, tx),
        fields(account_id = %account),
        err
    )]
    pub(crate) async fn latest_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
    ) -> Result<Option<OneTimeCodeRecord>, sqlx::Error> {
        query_as::<Postgres, OneTimeCodeRecord>(LATEST_CODE_SQL)
            .bind(account.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "two_factor.repository.delete_code",
        skip(self, tx),
        fields(code_id = %code),
        err
    )]
    pub(crate) async fn delete_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: OneTimeCodeId,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_CODE_SQL)
            .bind(code.into_i64())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    #[cfg(test)]
    pub(crate) async fn list_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
    ) -> Result<Vec<OneTimeCodeRecord>, sqlx::Error> {
        query_as::<Postgres, OneTimeCodeRecord>(LIST_CODES_SQL)
            .bind(account.into_i64())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OneTimeCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let raw: String = row.try_get("code")?;

        let code = OneTimeCode::parse(raw.trim()).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "code".to_string(),
            source: format!("malformed one-time code {raw:?}").into(),
        })?;

        Ok(Self {
            id: OneTimeCodeId::from_i64(row.try_get("id")?),
            account: row
                .try_get::<Option<i64>, _>("account_id")?
                .map(AccountId::from_i64),
            code,
            issued_at: row.try_get::<SqlxTimestamp, _>("issued_at")?.to_jiff(),
        })
    }
}
