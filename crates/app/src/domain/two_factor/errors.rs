//! One-time code errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::two_factor::delivery::{ConfigurationError, DeliveryError};

#[derive(Debug, Error)]
pub enum OneTimeCodeError {
    #[error("service misconfigured: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("code delivery failed")]
    Delivery(#[source] DeliveryError),

    #[error("account does not exist")]
    UnknownAccount,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OneTimeCodeError {
    /// Whether the caller can act on this error without operator help.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownAccount)
    }

    #[must_use]
    pub const fn is_misconfiguration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<DeliveryError> for OneTimeCodeError {
    fn from(error: DeliveryError) -> Self {
        Self::Delivery(error)
    }
}

impl From<Error> for OneTimeCodeError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownAccount,
            Some(_) | None => Self::Sql(error),
        }
    }
}
