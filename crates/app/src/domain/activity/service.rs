//! Activity log service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountId,
        activity::{
            errors::ActivityLogError, records::ActivityLogEntry,
            repository::PgActivityLogRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgActivityLog {
    db: Db,
    repository: PgActivityLogRepository,
}

impl PgActivityLog {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgActivityLogRepository::new(),
        }
    }
}

#[async_trait]
impl ActivityLog for PgActivityLog {
    async fn append(
        &self,
        actor: Option<AccountId>,
        action: &str,
    ) -> Result<ActivityLogEntry, ActivityLogError> {
        let mut tx = self.db.begin_transaction().await?;

        let entry = self.repository.append(&mut tx, actor, action).await?;

        tx.commit().await?;

        Ok(entry)
    }
}

#[automock]
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Appends an entry, optionally attributed to an account.
    async fn append(
        &self,
        actor: Option<AccountId>,
        action: &str,
    ) -> Result<ActivityLogEntry, ActivityLogError>;
}
