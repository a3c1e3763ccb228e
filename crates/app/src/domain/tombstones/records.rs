//! Tombstone Records

use jiff::Timestamp;

use crate::{
    domain::{
        catalog::records::ResourceRecord, entities::EntityKind,
        reservations::records::ReservationRecord, tombstones::snapshot::SnapshotEnvelope,
    },
    ids::TypedId,
};

/// Tombstone Id
pub type TombstoneId = TypedId<TombstoneRecord>;

/// Tombstone Record
#[derive(Debug, Clone, PartialEq)]
pub struct TombstoneRecord {
    pub id: TombstoneId,
    pub kind: EntityKind,
    pub entity_id: i64,
    pub payload: SnapshotEnvelope,
    pub deleted_at: Timestamp,
}

/// A live entity brought back from a tombstone.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoredEntity {
    Reservation(ReservationRecord),
    Resource(ResourceRecord),
}

impl RestoredEntity {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Reservation(_) => EntityKind::Reservation,
            Self::Resource(_) => EntityKind::Resource,
        }
    }

    #[must_use]
    pub const fn entity_id(&self) -> i64 {
        match self {
            Self::Reservation(reservation) => reservation.id.into_i64(),
            Self::Resource(resource) => resource.id.into_i64(),
        }
    }
}

/// How restore picks between several tombstones for the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TombstoneAmbiguityPolicy {
    /// Restore the newest tombstone and leave older ones in place.
    #[default]
    MostRecent,

    /// Refuse to restore until the duplicates are resolved by an operator.
    Reject,
}
