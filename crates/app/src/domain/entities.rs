//! Entity Kinds
//!
//! Stable string tags naming every entity type that can be tombstoned or
//! targeted by a permission grant. The dotted form is persisted, so existing
//! tags must never change.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum EntityKind {
    Reservation,
    Resource,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reservation => "reservations.reservation",
            Self::Resource => "catalog.resource",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl From<EntityKind> for &'static str {
    fn from(value: EntityKind) -> Self {
        value.as_str()
    }
}

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reservations.reservation" => Ok(Self::Reservation),
            "catalog.resource" => Ok(Self::Resource),
            other => Err(UnknownEntityKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for EntityKind {
    type Error = UnknownEntityKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity type tag `{0}`")]
pub struct UnknownEntityKind(pub String);

/// Reference to a single row of some entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl ResourceRef {
    #[must_use]
    pub const fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl Display for ResourceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn tags_parse_back_to_their_kind() {
        for kind in [EntityKind::Reservation, EntityKind::Resource] {
            assert_eq!(kind.as_str().parse::<EntityKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let result = "api.booking".parse::<EntityKind>();

        assert_eq!(result, Err(UnknownEntityKind("api.booking".to_string())));
    }

    #[test]
    fn serde_uses_dotted_tag() -> TestResult {
        let json = serde_json::to_string(&EntityKind::Reservation)?;

        assert_eq!(json, "\"reservations.reservation\"");
        assert_eq!(
            serde_json::from_str::<EntityKind>(&json)?,
            EntityKind::Reservation
        );

        Ok(())
    }
}
