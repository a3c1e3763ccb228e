//! Catalog
//!
//! Bookable resources. The core only reads them for ownership checks; the
//! write operations exist for catalog tooling and tests.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub(crate) use repository::PgResourcesRepository;
pub use service::*;
