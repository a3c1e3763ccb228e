//! Permissions service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountId,
        entities::ResourceRef,
        permissions::{
            errors::PermissionsServiceError,
            records::{Capabilities, PermissionGrant},
            repository::PgPermissionsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPermissionsService {
    db: Db,
    repository: PgPermissionsRepository,
}

impl PgPermissionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPermissionsRepository::new(),
        }
    }
}

#[async_trait]
impl PermissionsService for PgPermissionsService {
    async fn can_write(
        &self,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<bool, PermissionsServiceError> {
        Ok(self.capabilities(account, resource).await?.change)
    }

    async fn set_can_write(
        &self,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<PermissionGrant, PermissionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let grant = self.repository.set_owner(&mut tx, account, resource).await?;

        tx.commit().await?;

        Ok(grant)
    }

    async fn capabilities(
        &self,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<Capabilities, PermissionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let grant = self.repository.get_grant(&mut tx, account, resource).await?;

        tx.commit().await?;

        Ok(grant.map_or_else(Capabilities::none, |grant| {
            Capabilities::from_owner_flag(grant.is_owner)
        }))
    }
}

#[automock]
#[async_trait]
pub trait PermissionsService: Send + Sync {
    /// Whether the account may modify the resource. Absence of a grant is `false`.
    async fn can_write(
        &self,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<bool, PermissionsServiceError>;

    /// Make the account an owner of the resource. Idempotent.
    async fn set_can_write(
        &self,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<PermissionGrant, PermissionsServiceError>;

    /// View, change and delete capabilities derived from the owner flag.
    async fn capabilities(
        &self,
        account: AccountId,
        resource: ResourceRef,
    ) -> Result<Capabilities, PermissionsServiceError>;
}
