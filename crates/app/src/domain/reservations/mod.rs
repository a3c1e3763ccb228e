//! Reservations
//!
//! Lifecycle orchestration for bookings: every write fans out to the
//! permission ledger, the activity log or the tombstone store inside the same
//! transaction as the reservation row itself.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ReservationsServiceError;
pub(crate) use repository::PgReservationsRepository;
pub use service::*;
