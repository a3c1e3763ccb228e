//! Resources Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::catalog::{
    data::ResourceData,
    records::{ResourceId, ResourceRecord},
};

const CREATE_RESOURCE_SQL: &str = include_str!("sql/create_resource.sql");
const GET_RESOURCE_SQL: &str = include_str!("sql/get_resource.sql");
const LOCK_RESOURCE_SQL: &str = include_str!("sql/lock_resource.sql");
const DELETE_RESOURCE_SQL: &str = include_str!("sql/delete_resource.sql");
const RESTORE_RESOURCE_SQL: &str = include_str!("sql/restore_resource.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgResourcesRepository;

impl PgResourcesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_resource(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resource: &ResourceData,
    ) -> Result<ResourceRecord, sqlx::Error> {
        let (price, duration_days) = encode_numbers(resource)?;

        query_as::<Postgres, ResourceRecord>(CREATE_RESOURCE_SQL)
            .bind(&resource.category)
            .bind(&resource.name)
            .bind(&resource.promo)
            .bind(price)
            .bind(&resource.rating)
            .bind(duration_days)
            .bind(SqlxDate::from(resource.start_date))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_resource(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resource: ResourceId,
    ) -> Result<ResourceRecord, sqlx::Error> {
        query_as::<Postgres, ResourceRecord>(GET_RESOURCE_SQL)
            .bind(resource.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch the resource and hold a row lock until the transaction ends.
    pub(crate) async fn lock_resource(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resource: ResourceId,
    ) -> Result<Option<ResourceRecord>, sqlx::Error> {
        query_as::<Postgres, ResourceRecord>(LOCK_RESOURCE_SQL)
            .bind(resource.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_resource(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resource: ResourceId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_RESOURCE_SQL)
            .bind(resource.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Re-insert a resource under its original id.
    ///
    /// Returns `None` when a live row already holds that id.
    pub(crate) async fn restore_resource(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resource: ResourceId,
        data: &ResourceData,
    ) -> Result<Option<ResourceRecord>, sqlx::Error> {
        let (price, duration_days) = encode_numbers(data)?;

        query_as::<Postgres, ResourceRecord>(RESTORE_RESOURCE_SQL)
            .bind(resource.into_i64())
            .bind(&data.category)
            .bind(&data.name)
            .bind(&data.promo)
            .bind(price)
            .bind(&data.rating)
            .bind(duration_days)
            .bind(SqlxDate::from(data.start_date))
            .fetch_optional(&mut **tx)
            .await
    }
}

fn encode_numbers(resource: &ResourceData) -> Result<(i64, i32), sqlx::Error> {
    let price = i64::try_from(resource.price).map_err(|e| sqlx::Error::ColumnDecode {
        index: "price".to_string(),
        source: Box::new(e),
    })?;

    let duration_days =
        i32::try_from(resource.duration_days).map_err(|e| sqlx::Error::ColumnDecode {
            index: "duration_days".to_string(),
            source: Box::new(e),
        })?;

    Ok((price, duration_days))
}

impl<'r> FromRow<'r, PgRow> for ResourceRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let price_i64: i64 = row.try_get("price")?;
        let duration_i32: i32 = row.try_get("duration_days")?;

        let price = u64::try_from(price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        let duration_days = u32::try_from(duration_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "duration_days".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: ResourceId::from_i64(row.try_get("id")?),
            category: row.try_get("category")?,
            name: row.try_get("name")?,
            promo: row.try_get("promo")?,
            price,
            rating: row.try_get("rating")?,
            duration_days,
            start_date: row.try_get::<SqlxDate, _>("start_date")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
