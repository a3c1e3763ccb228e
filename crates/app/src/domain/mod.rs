//! Domain Concerns

pub mod accounts;
pub mod activity;
pub mod catalog;
pub mod entities;
pub mod permissions;
pub mod reservations;
pub mod tombstones;
pub mod two_factor;
