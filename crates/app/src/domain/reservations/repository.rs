//! Reservations Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    catalog::records::ResourceId,
    reservations::{
        data::ReservationData,
        records::{ReservationId, ReservationRecord},
    },
};

const CREATE_RESERVATION_SQL: &str = include_str!("sql/create_reservation.sql");
const GET_RESERVATION_SQL: &str = include_str!("sql/get_reservation.sql");
const LOCK_RESERVATION_SQL: &str = include_str!("sql/lock_reservation.sql");
const UPDATE_RESERVATION_SQL: &str = include_str!("sql/update_reservation.sql");
const DELETE_RESERVATION_SQL: &str = include_str!("sql/delete_reservation.sql");
const RESTORE_RESERVATION_SQL: &str = include_str!("sql/restore_reservation.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReservationsRepository;

impl PgReservationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(name = "reservations.repository.create_reservation", skip_all, err)]
    pub(crate) async fn create_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: &ReservationData,
    ) -> Result<ReservationRecord, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(CREATE_RESERVATION_SQL)
            .bind(reservation.resource_id.map(ResourceId::into_i64))
            .bind(SqlxDate::from(reservation.start_date))
            .bind(&reservation.holder_name)
            .bind(reservation.contact_address.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
    ) -> Result<ReservationRecord, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(GET_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch the reservation and hold a row lock until the transaction ends.
    pub(crate) async fn lock_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
    ) -> Result<Option<ReservationRecord>, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(LOCK_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "reservations.repository.update_reservation",
        skip(self, tx, update),
        err
    )]
    pub(crate) async fn update_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
        update: &ReservationData,
    ) -> Result<ReservationRecord, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(UPDATE_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .bind(update.resource_id.map(ResourceId::into_i64))
            .bind(SqlxDate::from(update.start_date))
            .bind(&update.holder_name)
            .bind(update.contact_address.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Re-insert a reservation under its original id.
    ///
    /// Returns `None` when a live row already holds that id.
    pub(crate) async fn restore_reservation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: ReservationId,
        data: &ReservationData,
    ) -> Result<Option<ReservationRecord>, sqlx::Error> {
        query_as::<Postgres, ReservationRecord>(RESTORE_RESERVATION_SQL)
            .bind(reservation.into_i64())
            .bind(data.resource_id.map(ResourceId::into_i64))
            .bind(SqlxDate::from(data.start_date))
            .bind(&data.holder_name)
            .bind(data.contact_address.as_deref())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ReservationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ReservationId::from_i64(row.try_get("id")?),
            resource_id: row
                .try_get::<Option<i64>, _>("resource_id")?
                .map(ResourceId::from_i64),
            start_date: row.try_get::<SqlxDate, _>("start_date")?.to_jiff(),
            holder_name: row.try_get("holder_name")?,
            contact_address: row.try_get("contact_address")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
