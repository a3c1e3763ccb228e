//! Tombstones
//!
//! Soft-delete store: an entity's full field state is captured as a
//! [`snapshot::SnapshotEnvelope`] in the same transaction that removes it,
//! and can later be restored under its original identifier.

pub mod errors;
pub mod records;
mod repository;
pub mod service;
pub mod snapshot;

pub use errors::TombstonesServiceError;
pub(crate) use repository::PgTombstonesRepository;
pub use service::*;
