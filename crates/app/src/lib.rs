//! Reservation bookkeeping core: soft-delete with restore, per-resource write
//! grants, an append-only activity log and one-time-code second factors.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod observability;

#[cfg(test)]
mod test;
