//! Catalog Records

use jiff::{Timestamp, civil::Date};

use crate::{
    domain::{
        catalog::data::ResourceData,
        entities::{EntityKind, ResourceRef},
        permissions::Permissible,
    },
    ids::TypedId,
};

/// Resource Id
pub type ResourceId = TypedId<ResourceRecord>;

/// Resource Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub id: ResourceId,
    pub category: String,
    pub name: String,
    pub promo: String,
    pub price: u64,
    pub rating: String,
    pub duration_days: u32,
    pub start_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ResourceRecord {
    #[must_use]
    pub fn data(&self) -> ResourceData {
        ResourceData {
            category: self.category.clone(),
            name: self.name.clone(),
            promo: self.promo.clone(),
            price: self.price,
            rating: self.rating.clone(),
            duration_days: self.duration_days,
            start_date: self.start_date,
        }
    }
}

impl Permissible for ResourceRecord {
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(EntityKind::Resource, self.id.into_i64())
    }
}
