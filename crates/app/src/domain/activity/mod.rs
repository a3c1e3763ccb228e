//! Activity Log
//!
//! Append-only audit trail. Entries are never updated or deleted.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::ActivityLogError;
pub(crate) use repository::PgActivityLogRepository;
pub use service::*;
