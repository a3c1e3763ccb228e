//! Activity Log Records

use jiff::Timestamp;

use crate::{domain::accounts::records::AccountId, ids::TypedId};

/// Activity Log Entry Id
pub type ActivityLogEntryId = TypedId<ActivityLogEntry>;

/// Activity Log Entry
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLogEntry {
    pub id: ActivityLogEntryId,

    /// Account the entry is attributed to, if any.
    pub actor: Option<AccountId>,

    /// Free-text description of what happened.
    pub action: String,

    pub created_at: Timestamp,
}
