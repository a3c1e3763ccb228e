//! Permissions Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use tracing::debug;

use crate::domain::{
    accounts::records::AccountId,
    entities::{EntityKind, ResourceRef},
    permissions::records::{PermissionGrant, PermissionGrantId},
};

const GET_GRANT_SQL: &str = include_str!("sql/get_grant.sql");
const SET_OWNER_SQL: &str = include_str!("sql/set_owner.sql");

#[cfg(test)]
const COUNT_GRANTS_SQL: &str = include_str!("sql/count_grants.sql");

#[cfg(test)]
const INSERT_GRANT_SQL: &str = include_str!("sql/insert_grant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPermissionsRepository;

impl PgPermissionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_grant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<Option<PermissionGrant>, sqlx::Error> {
        query_as::<Postgres, PermissionGrant>(GET_GRANT_SQL)
            .bind(account.into_i64())
            .bind(resource.kind.as_str())
            .bind(resource.id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Upsert an owner grant. The unique constraint turns concurrent callers
    /// into a single row.
    #[tracing::instrument(
        name = "permissions.repository.set_owner",
        skip(self, tx),
        fields(resource = %resource),
        err
    )]
    pub(crate) async fn set_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<PermissionGrant, sqlx::Error> {
        let grant = query_as::<Postgres, PermissionGrant>(SET_OWNER_SQL)
            .bind(account.into_i64())
            .bind(resource.kind.as_str())
            .bind(resource.id)
            .fetch_one(&mut **tx)
            .await?;

        debug!(grant_id = %grant.id, "owner grant set");

        Ok(grant)
    }

    #[cfg(test)]
    pub(crate) async fn count_grants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<Postgres, i64>(COUNT_GRANTS_SQL)
            .bind(account.into_i64())
            .bind(resource.kind.as_str())
            .bind(resource.id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Plain insert, bypassing the upsert.
    #[cfg(test)]
    pub(crate) async fn insert_grant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
        resource: ResourceRef,
        is_owner: bool,
    ) -> Result<PermissionGrant, sqlx::Error> {
        query_as::<Postgres, PermissionGrant>(INSERT_GRANT_SQL)
            .bind(account.into_i64())
            .bind(resource.kind.as_str())
            .bind(resource.id)
            .bind(is_owner)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PermissionGrant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind = row
            .try_get::<String, _>("resource_type")?
            .parse::<EntityKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "resource_type".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: PermissionGrantId::from_i64(row.try_get("id")?),
            account: AccountId::from_i64(row.try_get("account_id")?),
            resource: ResourceRef::new(kind, row.try_get("resource_id")?),
            is_owner: row.try_get("is_owner")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
