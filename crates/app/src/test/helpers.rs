//! Test Helpers

use jiff::civil::date;

use crate::domain::{
    catalog::{data::ResourceData, records::ResourceId},
    reservations::data::ReservationData,
};

pub(crate) fn sample_resource(name: &str) -> ResourceData {
    ResourceData {
        category: "Adventure".to_string(),
        name: name.to_string(),
        promo: String::new(),
        price: 12_500,
        rating: "4.5".to_string(),
        duration_days: 3,
        start_date: date(2026, 6, 1),
    }
}

pub(crate) fn sample_reservation(
    resource: Option<ResourceId>,
    contact: Option<&str>,
) -> ReservationData {
    ReservationData {
        resource_id: resource,
        start_date: date(2026, 6, 1),
        holder_name: "Ada Lovelace".to_string(),
        contact_address: contact.map(ToString::to_string),
    }
}
