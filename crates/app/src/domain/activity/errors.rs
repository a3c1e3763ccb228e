//! Activity log errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivityLogError {
    #[error("actor account does not exist")]
    UnknownActor,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl ActivityLogError {
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownActor)
    }
}

impl From<Error> for ActivityLogError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownActor,
            Some(_) | None => Self::Sql(error),
        }
    }
}
