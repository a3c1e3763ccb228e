//! Catalog Data

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::domain::{entities::EntityKind, tombstones::snapshot::Snapshot};

/// Full field state of a resource, used for creation and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    pub category: String,
    pub name: String,

    #[serde(default)]
    pub promo: String,

    /// Price in minor currency units.
    pub price: u64,

    #[serde(default)]
    pub rating: String,

    pub duration_days: u32,
    pub start_date: Date,
}

impl Snapshot for ResourceData {
    const KIND: EntityKind = EntityKind::Resource;
}
