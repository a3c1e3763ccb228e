//! Reservation Data

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::domain::{
    catalog::records::ResourceId, entities::EntityKind, tombstones::snapshot::Snapshot,
};

/// Full field state of a reservation, used for create, update and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationData {
    /// Booked resource; cleared when the resource is removed.
    #[serde(default)]
    pub resource_id: Option<ResourceId>,

    pub start_date: Date,

    /// Name the booking is held under.
    pub holder_name: String,

    /// Email-like address used to resolve an owning account.
    #[serde(default)]
    pub contact_address: Option<String>,
}

impl ReservationData {
    /// Contact address exactly as stored, if present and non-empty.
    #[must_use]
    pub fn contact(&self) -> Option<&str> {
        self.contact_address
            .as_deref()
            .filter(|address| !address.is_empty())
    }
}

impl Snapshot for ReservationData {
    const KIND: EntityKind = EntityKind::Reservation;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn data(contact_address: Option<&str>) -> ReservationData {
        ReservationData {
            resource_id: None,
            start_date: date(2026, 7, 1),
            holder_name: "Ada".to_string(),
            contact_address: contact_address.map(ToString::to_string),
        }
    }

    #[test]
    fn empty_contact_is_treated_as_absent() {
        assert_eq!(data(Some("")).contact(), None);
        assert_eq!(data(None).contact(), None);
    }

    #[test]
    fn contact_is_passed_through_verbatim() {
        assert_eq!(
            data(Some(" ada@localhost\t")).contact(),
            Some(" ada@localhost\t")
        );
    }
}
