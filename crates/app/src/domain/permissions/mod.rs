//! Permissions
//!
//! Per-(account, resource) write capability. A single owner flag stands for
//! the view, change and delete capabilities together.

pub mod errors;
mod permissible;
pub mod records;
mod repository;
pub mod service;

pub use errors::PermissionsServiceError;
pub use permissible::Permissible;
pub(crate) use repository::PgPermissionsRepository;
pub use service::*;
