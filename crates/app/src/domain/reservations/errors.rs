//! Reservations service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::tombstones::snapshot::SnapshotError;

#[derive(Debug, Error)]
pub enum ReservationsServiceError {
    #[error("reservation not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("reservation could not be snapshotted")]
    Snapshot(#[from] SnapshotError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl ReservationsServiceError {
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::InvalidReference | Self::MissingRequiredData
        )
    }
}

impl From<Error> for ReservationsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
