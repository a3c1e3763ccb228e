//! Permissions service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PermissionsServiceError {
    #[error("account does not exist")]
    UnknownAccount,

    /// Only reachable through a store-level race; the upsert prevents it otherwise.
    #[error("permission grant already exists")]
    ConstraintViolation(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl PermissionsServiceError {
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownAccount)
    }
}

impl From<Error> for PermissionsServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::ConstraintViolation(error),
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownAccount,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
