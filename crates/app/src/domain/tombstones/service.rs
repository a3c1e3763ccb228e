//! Tombstones service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        catalog::{PgResourcesRepository, data::ResourceData, records::ResourceId},
        entities::EntityKind,
        reservations::{
            PgReservationsRepository, data::ReservationData, records::ReservationId,
        },
        tombstones::{
            errors::TombstonesServiceError,
            records::{RestoredEntity, TombstoneAmbiguityPolicy, TombstoneRecord},
            repository::PgTombstonesRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgTombstonesService {
    db: Db,
    policy: TombstoneAmbiguityPolicy,
    tombstones: PgTombstonesRepository,
    reservations: PgReservationsRepository,
    resources: PgResourcesRepository,
}

impl PgTombstonesService {
    #[must_use]
    pub fn new(db: Db, policy: TombstoneAmbiguityPolicy) -> Self {
        Self {
            db,
            policy,
            tombstones: PgTombstonesRepository::new(),
            reservations: PgReservationsRepository::new(),
            resources: PgResourcesRepository::new(),
        }
    }

    async fn select_tombstone(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: EntityKind,
        entity_id: i64,
    ) -> Result<TombstoneRecord, TombstonesServiceError> {
        let mut matches = self
            .tombstones
            .find_tombstones(tx, kind, entity_id)
            .await?;

        let count = matches.len();

        if count > 1 {
            match self.policy {
                TombstoneAmbiguityPolicy::Reject => {
                    return Err(TombstonesServiceError::AmbiguousMatch {
                        kind,
                        entity_id,
                        count,
                    });
                }
                TombstoneAmbiguityPolicy::MostRecent => {
                    warn!(
                        %kind,
                        entity_id,
                        count,
                        "several tombstones match; restoring the most recent"
                    );
                }
            }
        }

        // Newest first.
        matches.truncate(1);

        matches
            .pop()
            .ok_or(TombstonesServiceError::NotFound { kind, entity_id })
    }
}

#[async_trait]
impl TombstonesService for PgTombstonesService {
    #[tracing::instrument(name = "tombstones.service.restore", skip(self), err)]
    async fn restore(
        &self,
        kind: EntityKind,
        entity_id: i64,
    ) -> Result<RestoredEntity, TombstonesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let tombstone = self.select_tombstone(&mut tx, kind, entity_id).await?;

        let restored = match kind {
            EntityKind::Reservation => {
                let data: ReservationData = tombstone.payload.decode()?;

                self.reservations
                    .restore_reservation(&mut tx, ReservationId::from_i64(entity_id), &data)
                    .await?
                    .map(RestoredEntity::Reservation)
            }
            EntityKind::Resource => {
                let data: ResourceData = tombstone.payload.decode()?;

                self.resources
                    .restore_resource(&mut tx, ResourceId::from_i64(entity_id), &data)
                    .await?
                    .map(RestoredEntity::Resource)
            }
        }
        .ok_or(TombstonesServiceError::AlreadyExists { kind, entity_id })?;

        let deleted = self
            .tombstones
            .delete_tombstone(&mut tx, tombstone.id)
            .await?;

        // The row is locked by `find_tombstones`, so exactly one goes.
        debug_assert_eq!(deleted, 1, "consumed tombstone must be deleted exactly once");

        tx.commit().await?;

        info!(
            %kind,
            entity_id,
            tombstone_id = %tombstone.id,
            deleted,
            "restored from tombstone"
        );

        Ok(restored)
    }

    async fn list_tombstones(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<TombstoneRecord>, TombstonesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let tombstones = self.tombstones.list_tombstones(&mut tx, kind).await?;

        tx.commit().await?;

        Ok(tombstones)
    }
}

#[automock]
#[async_trait]
pub trait TombstonesService: Send + Sync {
    /// Bring a deleted entity back under its original id and drop the
    /// tombstone that was consumed.
    async fn restore(
        &self,
        kind: EntityKind,
        entity_id: i64,
    ) -> Result<RestoredEntity, TombstonesServiceError>;

    /// Live tombstones of one kind, newest first.
    async fn list_tombstones(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<TombstoneRecord>, TombstonesServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::{
        domain::{
            catalog::CatalogService,
            permissions::{Permissible, PermissionsService},
            reservations::{ReservationsService, ReservationsServiceError},
            tombstones::snapshot::SnapshotEnvelope,
        },
        test::{
            TestContext,
            helpers::{sample_reservation, sample_resource},
        },
    };

    use super::*;

    async fn bury(ctx: &TestContext, entity_id: i64, data: &ReservationData) -> TestResult {
        let envelope = SnapshotEnvelope::capture(entity_id, data)?;
        let mut tx = ctx.db.begin_test_transaction().await;

        PgTombstonesRepository::new()
            .create_tombstone(&mut tx, &envelope)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    #[tokio::test]
    async fn delete_then_restore_round_trips_reservation() -> TestResult {
        let ctx = TestContext::new().await;
        let resource = ctx.catalog.create_resource(sample_resource("Reef Dive")).await?;

        let created = ctx
            .reservations
            .create_reservation(sample_reservation(Some(resource.id), Some("ada@localhost")))
            .await?;

        ctx.reservations.delete_reservation(created.id).await?;

        let restored = ctx
            .tombstones
            .restore(EntityKind::Reservation, created.id.into_i64())
            .await?;

        let RestoredEntity::Reservation(restored) = restored else {
            return Err("expected a reservation".into());
        };

        assert_eq!(restored.id, created.id);
        assert_eq!(restored.data(), created.data());
        assert_eq!(ctx.reservations.get_reservation(created.id).await?.data(), created.data());
        assert!(
            ctx.tombstones
                .list_tombstones(EntityKind::Reservation)
                .await?
                .is_empty(),
            "consumed tombstone should be removed"
        );

        Ok(())
    }

    #[tokio::test]
    async fn restore_without_tombstone_is_not_found_and_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .reservations
            .create_reservation(sample_reservation(None, None))
            .await?;

        ctx.reservations.delete_reservation(created.id).await?;

        let result = ctx
            .tombstones
            .restore(EntityKind::Reservation, created.id.into_i64() + 1)
            .await;

        assert!(
            matches!(
                result,
                Err(TombstonesServiceError::NotFound { kind: EntityKind::Reservation, .. })
            ),
            "expected NotFound, got {result:?}"
        );
        assert!(result.is_err_and(|error| error.is_client_error()));
        assert_eq!(
            ctx.tombstones
                .list_tombstones(EntityKind::Reservation)
                .await?
                .len(),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn restore_twice_fails_the_second_time() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .reservations
            .create_reservation(sample_reservation(None, None))
            .await?;

        ctx.reservations.delete_reservation(created.id).await?;
        ctx.tombstones
            .restore(EntityKind::Reservation, created.id.into_i64())
            .await?;

        let result = ctx
            .tombstones
            .restore(EntityKind::Reservation, created.id.into_i64())
            .await;

        assert!(
            matches!(result, Err(TombstonesServiceError::NotFound { .. })),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_tombstones_restore_most_recent() -> TestResult {
        let ctx = TestContext::new().await;

        let older = ReservationData {
            holder_name: "Older".to_string(),
            ..sample_reservation(None, None)
        };
        let newer = ReservationData {
            holder_name: "Newer".to_string(),
            ..sample_reservation(None, None)
        };

        bury(&ctx, 77, &older).await?;
        bury(&ctx, 77, &newer).await?;

        let restored = ctx.tombstones.restore(EntityKind::Reservation, 77).await?;

        let RestoredEntity::Reservation(restored) = restored else {
            return Err("expected a reservation".into());
        };

        assert_eq!(restored.holder_name, "Newer");

        let remaining = ctx
            .tombstones
            .list_tombstones(EntityKind::Reservation)
            .await?;

        assert_eq!(remaining.len(), 1, "only the consumed tombstone is removed");
        assert_eq!(
            remaining
                .first()
                .map(|t| t.payload.decode::<ReservationData>())
                .transpose()?,
            Some(older)
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_tombstones_rejected_under_reject_policy() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgTombstonesService::new(ctx.database(), TombstoneAmbiguityPolicy::Reject);

        bury(&ctx, 12, &sample_reservation(None, None)).await?;
        bury(&ctx, 12, &sample_reservation(None, None)).await?;

        let result = service.restore(EntityKind::Reservation, 12).await;

        assert!(
            matches!(result, Err(TombstonesServiceError::AmbiguousMatch { count: 2, .. })),
            "expected AmbiguousMatch, got {result:?}"
        );
        assert_eq!(service.list_tombstones(EntityKind::Reservation).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn restore_over_live_row_keeps_tombstone() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .reservations
            .create_reservation(sample_reservation(None, None))
            .await?;

        bury(&ctx, created.id.into_i64(), &created.data()).await?;

        let result = ctx
            .tombstones
            .restore(EntityKind::Reservation, created.id.into_i64())
            .await;

        assert!(
            matches!(result, Err(TombstonesServiceError::AlreadyExists { .. })),
            "expected AlreadyExists, got {result:?}"
        );
        assert_eq!(
            ctx.tombstones
                .list_tombstones(EntityKind::Reservation)
                .await?
                .len(),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn restored_reservation_loses_link_to_removed_resource() -> TestResult {
        let ctx = TestContext::new().await;
        let resource = ctx.catalog.create_resource(sample_resource("Volcano Trek")).await?;

        let created = ctx
            .reservations
            .create_reservation(sample_reservation(Some(resource.id), None))
            .await?;

        ctx.reservations.delete_reservation(created.id).await?;
        ctx.catalog.delete_resource(resource.id).await?;

        let restored = ctx
            .tombstones
            .restore(EntityKind::Reservation, created.id.into_i64())
            .await?;

        let RestoredEntity::Reservation(restored) = restored else {
            return Err("expected a reservation".into());
        };

        assert_eq!(restored.resource_id, None);
        assert_eq!(restored.holder_name, created.holder_name);

        Ok(())
    }

    #[tokio::test]
    async fn delete_then_restore_round_trips_resource() -> TestResult {
        let ctx = TestContext::new().await;
        let created = ctx
            .catalog
            .create_resource(ResourceData {
                start_date: date(2027, 3, 14),
                ..sample_resource("Desert Camp")
            })
            .await?;

        ctx.catalog.delete_resource(created.id).await?;

        let restored = ctx
            .tombstones
            .restore(EntityKind::Resource, created.id.into_i64())
            .await?;

        assert_eq!(restored.kind(), EntityKind::Resource);
        assert_eq!(restored.entity_id(), created.id.into_i64());
        assert_eq!(ctx.catalog.get_resource(created.id).await?.data(), created.data());

        Ok(())
    }

    #[tokio::test]
    async fn restore_writes_no_activity_and_grants_nothing_new() -> TestResult {
        let ctx = TestContext::new().await;
        let bystander = ctx.create_account("bob", "bob@localhost").await;

        let created = ctx
            .reservations
            .create_reservation(sample_reservation(None, Some("bob-typo@localhost")))
            .await?;

        ctx.reservations.delete_reservation(created.id).await?;
        ctx.tombstones
            .restore(EntityKind::Reservation, created.id.into_i64())
            .await?;

        assert!(ctx.activity_entries().await.is_empty());
        assert!(
            !ctx.permissions
                .can_write(bystander, created.resource_ref())
                .await?
        );

        let result = ctx.reservations.get_reservation(created.id).await;

        assert!(
            !matches!(result, Err(ReservationsServiceError::NotFound)),
            "restored reservation should be live again"
        );

        Ok(())
    }
}
