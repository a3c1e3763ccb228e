//! Two-Factor Authentication
//!
//! Short numeric one-time codes delivered out of band. Validation only ever
//! compares against the most recently issued code for the account.

mod code;
pub mod delivery;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use code::*;
pub use errors::OneTimeCodeError;
pub use service::*;
