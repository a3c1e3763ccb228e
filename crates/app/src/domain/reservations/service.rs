//! Reservations service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::{
    database::Db,
    domain::{
        accounts::{AccountDirectory, records::AccountRecord},
        activity::PgActivityLogRepository,
        permissions::{Permissible, PgPermissionsRepository},
        reservations::{
            data::ReservationData,
            errors::ReservationsServiceError,
            records::{ReservationId, ReservationRecord},
            repository::PgReservationsRepository,
        },
        tombstones::{PgTombstonesRepository, snapshot::SnapshotEnvelope},
    },
};

#[derive(Clone)]
pub struct PgReservationsService {
    db: Db,
    directory: Arc<dyn AccountDirectory>,
    reservations: PgReservationsRepository,
    permissions: PgPermissionsRepository,
    activity: PgActivityLogRepository,
    tombstones: PgTombstonesRepository,
}

impl PgReservationsService {
    #[must_use]
    pub fn new(db: Db, directory: Arc<dyn AccountDirectory>) -> Self {
        Self {
            db,
            directory,
            reservations: PgReservationsRepository::new(),
            permissions: PgPermissionsRepository::new(),
            activity: PgActivityLogRepository::new(),
            tombstones: PgTombstonesRepository::new(),
        }
    }

    /// Best-effort owner resolution. Lookup failures degrade to "no owner".
    async fn resolve_owner(&self, reservation: &ReservationData) -> Option<AccountRecord> {
        let address = reservation.contact()?;

        match self.directory.lookup_by_contact(address).await {
            Ok(owner) => owner,
            Err(error) => {
                warn!(%error, "account lookup failed; continuing without owner");

                None
            }
        }
    }
}

impl Debug for PgReservationsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PgReservationsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReservationsService for PgReservationsService {
    async fn get_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<ReservationRecord, ReservationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let reservation = self
            .reservations
            .get_reservation(&mut tx, reservation)
            .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    #[tracing::instrument(
        name = "reservations.service.create_reservation",
        skip_all,
        fields(reservation_id = tracing::field::Empty, owner_id = tracing::field::Empty),
        err
    )]
    async fn create_reservation(
        &self,
        reservation: ReservationData,
    ) -> Result<ReservationRecord, ReservationsServiceError> {
        // The directory reads through its own connection, so resolve before
        // the transaction takes one.
        let owner = self.resolve_owner(&reservation).await;

        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .reservations
            .create_reservation(&mut tx, &reservation)
            .await?;

        tracing::Span::current().record("reservation_id", created.id.into_i64());

        if let Some(owner) = owner {
            tracing::Span::current().record("owner_id", owner.id.into_i64());

            self.permissions
                .set_owner(&mut tx, owner.id, created.resource_ref())
                .await?;

            self.activity
                .append(&mut tx, Some(owner.id), &saved_action(&owner, created.id))
                .await?;
        } else {
            debug!("no owner resolved for new reservation");
        }

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "reservations.service.update_reservation",
        skip(self, update),
        fields(owner_id = tracing::field::Empty),
        err
    )]
    async fn update_reservation(
        &self,
        reservation: ReservationId,
        update: ReservationData,
    ) -> Result<ReservationRecord, ReservationsServiceError> {
        let owner = self.resolve_owner(&update).await;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .reservations
            .update_reservation(&mut tx, reservation, &update)
            .await?;

        if let Some(owner) = owner {
            tracing::Span::current().record("owner_id", owner.id.into_i64());

            self.activity
                .append(&mut tx, Some(owner.id), &updated_action(&owner, updated.id))
                .await?;
        } else {
            self.activity
                .append(
                    &mut tx,
                    None,
                    &anonymous_update_action(updated.id, update.contact_address.as_deref()),
                )
                .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(name = "reservations.service.delete_reservation", skip(self), err)]
    async fn delete_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<(), ReservationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let existing = self
            .reservations
            .lock_reservation(&mut tx, reservation)
            .await?
            .ok_or(ReservationsServiceError::NotFound)?;

        let envelope = SnapshotEnvelope::capture(existing.id.into_i64(), &existing.data())?;

        self.tombstones.create_tombstone(&mut tx, &envelope).await?;

        self.reservations
            .delete_reservation(&mut tx, reservation)
            .await?;

        tx.commit().await?;

        info!(reservation_id = %reservation, "reservation deleted and tombstoned");

        Ok(())
    }
}

fn saved_action(owner: &AccountRecord, reservation: ReservationId) -> String {
    format!(
        "User #{} \"{}\" saved reservation #{reservation}",
        owner.id, owner.email
    )
}

fn updated_action(owner: &AccountRecord, reservation: ReservationId) -> String {
    format!(
        "User #{} \"{}\" updated reservation #{reservation}",
        owner.id, owner.email
    )
}

fn anonymous_update_action(reservation: ReservationId, contact: Option<&str>) -> String {
    format!(
        "Reservation #{reservation} updated (contact: {})",
        contact.unwrap_or_default()
    )
}

#[automock]
#[async_trait]
pub trait ReservationsService: Send + Sync {
    /// Retrieve a single reservation.
    async fn get_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<ReservationRecord, ReservationsServiceError>;

    /// Persist a reservation. A contact address matching an account makes that
    /// account the owner and records the creation in the activity log.
    async fn create_reservation(
        &self,
        reservation: ReservationData,
    ) -> Result<ReservationRecord, ReservationsServiceError>;

    /// Replace a reservation's fields and record the update in the activity log.
    async fn update_reservation(
        &self,
        reservation: ReservationId,
        update: ReservationData,
    ) -> Result<ReservationRecord, ReservationsServiceError>;

    /// Tombstone and then remove a reservation.
    async fn delete_reservation(
        &self,
        reservation: ReservationId,
    ) -> Result<(), ReservationsServiceError>;
}
