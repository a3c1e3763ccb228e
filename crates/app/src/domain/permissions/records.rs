//! Permission Records

use jiff::Timestamp;

use crate::{
    domain::{accounts::records::AccountId, entities::ResourceRef},
    ids::TypedId,
};

/// Permission Grant Id
pub type PermissionGrantId = TypedId<PermissionGrant>;

/// Permission Grant Record
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionGrant {
    pub id: PermissionGrantId,
    pub account: AccountId,
    pub resource: ResourceRef,
    pub is_owner: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Capabilities an account holds on a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub view: bool,
    pub change: bool,
    pub delete: bool,
}

impl Capabilities {
    /// Every capability derives from the owner flag.
    #[must_use]
    pub const fn from_owner_flag(is_owner: bool) -> Self {
        Self {
            view: is_owner,
            change: is_owner,
            delete: is_owner,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self::from_owner_flag(false)
    }
}
