//! Tombstones service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{entities::EntityKind, tombstones::snapshot::SnapshotError};

#[derive(Debug, Error)]
pub enum TombstonesServiceError {
    #[error("nothing to restore for {kind} #{entity_id}")]
    NotFound { kind: EntityKind, entity_id: i64 },

    #[error("{count} tombstones match {kind} #{entity_id}")]
    AmbiguousMatch {
        kind: EntityKind,
        entity_id: i64,
        count: usize,
    },

    #[error("a live {kind} #{entity_id} already exists")]
    AlreadyExists { kind: EntityKind, entity_id: i64 },

    #[error("tombstone payload could not be decoded")]
    Snapshot(#[from] SnapshotError),

    #[error("restored entity violates a constraint")]
    ConstraintViolation(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl TombstonesServiceError {
    /// Whether the failure stems from the request rather than the service.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::AmbiguousMatch { .. } | Self::AlreadyExists { .. }
        )
    }
}

impl From<Error> for TombstonesServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation,
            ) => Self::ConstraintViolation(error),
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
