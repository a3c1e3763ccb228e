//! Accounts
//!
//! Read-only view of the external account directory.

mod directory;
pub mod records;

pub use directory::*;
