//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        catalog::{
            data::ResourceData,
            errors::CatalogServiceError,
            records::{ResourceId, ResourceRecord},
            repository::PgResourcesRepository,
        },
        tombstones::{PgTombstonesRepository, snapshot::SnapshotEnvelope},
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgResourcesRepository,
    tombstones: PgTombstonesRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgResourcesRepository::new(),
            tombstones: PgTombstonesRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_resource(
        &self,
        resource: ResourceData,
    ) -> Result<ResourceRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_resource(&mut tx, &resource).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_resource(
        &self,
        resource: ResourceId,
    ) -> Result<ResourceRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let resource = self.repository.get_resource(&mut tx, resource).await?;

        tx.commit().await?;

        Ok(resource)
    }

    #[tracing::instrument(name = "catalog.service.delete_resource", skip(self), err)]
    async fn delete_resource(&self, resource: ResourceId) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let existing = self
            .repository
            .lock_resource(&mut tx, resource)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        let envelope = SnapshotEnvelope::capture(existing.id.into_i64(), &existing.data())?;

        self.tombstones.create_tombstone(&mut tx, &envelope).await?;
        self.repository.delete_resource(&mut tx, resource).await?;

        tx.commit().await?;

        info!(resource_id = %resource, "resource deleted and tombstoned");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a new resource.
    async fn create_resource(
        &self,
        resource: ResourceData,
    ) -> Result<ResourceRecord, CatalogServiceError>;

    /// Retrieve a single resource.
    async fn get_resource(
        &self,
        resource: ResourceId,
    ) -> Result<ResourceRecord, CatalogServiceError>;

    /// Tombstones and then removes a resource.
    async fn delete_resource(&self, resource: ResourceId) -> Result<(), CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{entities::EntityKind, tombstones::TombstonesService},
        test::{TestContext, helpers::sample_resource},
    };

    use super::*;

    #[tokio::test]
    async fn create_resource_returns_stored_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let data = sample_resource("Sea Kayaking");

        let created = ctx.catalog.create_resource(data.clone()).await?;

        assert_eq!(created.data(), data);

        Ok(())
    }

    #[tokio::test]
    async fn get_resource_returns_created_resource() -> TestResult {
        let ctx = TestContext::new().await;
        let created = ctx
            .catalog
            .create_resource(sample_resource("Glacier Hike"))
            .await?;

        let fetched = ctx.catalog.get_resource(created.id).await?;

        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn get_resource_unknown_id_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_resource(ResourceId::from_i64(404)).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_resource_leaves_a_tombstone() -> TestResult {
        let ctx = TestContext::new().await;
        let created = ctx
            .catalog
            .create_resource(sample_resource("Canyon Rafting"))
            .await?;

        ctx.catalog.delete_resource(created.id).await?;

        let result = ctx.catalog.get_resource(created.id).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let tombstones = ctx.tombstones.list_tombstones(EntityKind::Resource).await?;

        assert_eq!(tombstones.len(), 1);
        assert_eq!(tombstones.first().map(|t| t.entity_id), Some(created.id.into_i64()));

        Ok(())
    }

    #[tokio::test]
    async fn delete_resource_unknown_id_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.delete_resource(ResourceId::from_i64(404)).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
