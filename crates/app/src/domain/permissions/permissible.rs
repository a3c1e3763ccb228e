//! Permissible

use crate::domain::entities::ResourceRef;

/// Records that can be the target of a permission grant.
pub trait Permissible {
    fn resource_ref(&self) -> ResourceRef;
}

impl Permissible for ResourceRef {
    fn resource_ref(&self) -> ResourceRef {
        *self
    }
}
