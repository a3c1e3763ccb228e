//! Account Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::ids::TypedId;

/// Account Id
pub type AccountId = TypedId<AccountRecord>;

/// Account Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: AccountId,
    pub username: String,
    pub email: String,
}

/// The caller of an authentication step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// No session; never passes a second-factor check.
    Anonymous,

    Account(AccountId),
}

impl Principal {
    #[must_use]
    pub const fn account(self) -> Option<AccountId> {
        match self {
            Self::Anonymous => None,
            Self::Account(id) => Some(id),
        }
    }
}

impl From<AccountId> for Principal {
    fn from(value: AccountId) -> Self {
        Self::Account(value)
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::Account(id) => write!(f, "account #{id}"),
        }
    }
}
