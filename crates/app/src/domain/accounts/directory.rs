//! Account Directory

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};
use tracing::debug;

use crate::domain::accounts::records::{AccountId, AccountRecord};

const FIND_ACCOUNTS_BY_EMAIL_SQL: &str = include_str!("sql/find_accounts_by_email.sql");

/// Resolves accounts from contact details.
#[automock]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Find the single account whose email exactly matches `address`.
    ///
    /// Returns `Ok(None)` when nothing matches or the address is ambiguous.
    async fn lookup_by_contact(&self, address: &str)
    -> Result<Option<AccountRecord>, sqlx::Error>;
}

/// PostgreSQL-backed account directory.
#[derive(Debug, Clone)]
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    #[tracing::instrument(name = "accounts.directory.lookup_by_contact", skip(self), err)]
    async fn lookup_by_contact(
        &self,
        address: &str,
    ) -> Result<Option<AccountRecord>, sqlx::Error> {
        let mut matches = query_as::<Postgres, AccountRecord>(FIND_ACCOUNTS_BY_EMAIL_SQL)
            .bind(address)
            .fetch_all(&self.pool)
            .await?;

        if matches.len() > 1 {
            debug!(address, "contact address matches several accounts");

            return Ok(None);
        }

        Ok(matches.pop())
    }
}

impl<'r> FromRow<'r, PgRow> for AccountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: AccountId::from_i64(row.try_get("id")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
        })
    }
}
