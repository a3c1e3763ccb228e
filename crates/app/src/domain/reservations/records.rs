//! Reservation Records

use jiff::{Timestamp, civil::Date};

use crate::{
    domain::{
        catalog::records::ResourceId,
        entities::{EntityKind, ResourceRef},
        permissions::Permissible,
        reservations::data::ReservationData,
    },
    ids::TypedId,
};

/// Reservation Id
pub type ReservationId = TypedId<ReservationRecord>;

/// Reservation Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    pub id: ReservationId,
    pub resource_id: Option<ResourceId>,
    pub start_date: Date,
    pub holder_name: String,
    pub contact_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReservationRecord {
    #[must_use]
    pub fn data(&self) -> ReservationData {
        ReservationData {
            resource_id: self.resource_id,
            start_date: self.start_date,
            holder_name: self.holder_name.clone(),
            contact_address: self.contact_address.clone(),
        }
    }
}

impl Permissible for ReservationRecord {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(EntityKind::Reservation, self.id.into_i64())
    }
}
