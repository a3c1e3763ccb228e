//! Snapshot Envelope

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::entities::EntityKind;

/// Envelope version written by this build.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Field state of an entity that can be tombstoned.
///
/// Implementors serialize to a JSON object. Fields added later must carry
/// `#[serde(default)]` so envelopes written by older builds still decode.
pub trait Snapshot: Serialize + DeserializeOwned {
    const KIND: EntityKind;
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot fields must serialize to an object")]
    NotAnObject,

    #[error("snapshot version {found} is newer than supported version {}", SNAPSHOT_VERSION)]
    UnsupportedVersion { found: u16 },

    #[error("snapshot holds `{found}`, expected `{expected}`")]
    Mismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("snapshot codec error")]
    Codec(#[from] serde_json::Error),
}

/// Persisted payload of a tombstone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub version: u16,

    #[serde(rename = "type")]
    pub type_tag: EntityKind,

    pub entity_id: i64,

    pub fields: Map<String, Value>,
}

impl SnapshotEnvelope {
    /// Capture `entity` as a current-version envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not serialize to a JSON object.
    pub fn capture<S: Snapshot>(entity_id: i64, entity: &S) -> Result<Self, SnapshotError> {
        let Value::Object(fields) = serde_json::to_value(entity)? else {
            return Err(SnapshotError::NotAnObject);
        };

        Ok(Self {
            version: SNAPSHOT_VERSION,
            type_tag: S::KIND,
            entity_id,
            fields,
        })
    }

    /// Rebuild the entity's field state.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope belongs to another kind, was written by
    /// a newer build, or its fields no longer fit `S`.
    pub fn decode<S: Snapshot>(&self) -> Result<S, SnapshotError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
            });
        }

        if self.type_tag != S::KIND {
            return Err(SnapshotError::Mismatch {
                expected: S::KIND,
                found: self.type_tag,
            });
        }

        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Widget {
        label: String,

        #[serde(default)]
        colour: Option<String>,
    }

    impl Snapshot for Widget {
        const KIND: EntityKind = EntityKind::Resource;
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Gadget {
        label: String,
    }

    impl Snapshot for Gadget {
        const KIND: EntityKind = EntityKind::Reservation;
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Scalar(u8);

    impl Snapshot for Scalar {
        const KIND: EntityKind = EntityKind::Resource;
    }

    #[test]
    fn capture_writes_tag_id_and_fields() -> TestResult {
        let envelope = SnapshotEnvelope::capture(
            7,
            &Widget {
                label: "kayak".to_string(),
                colour: None,
            },
        )?;

        assert_eq!(
            serde_json::to_value(&envelope)?,
            json!({
                "version": 1,
                "type": "catalog.resource",
                "entity_id": 7,
                "fields": { "label": "kayak", "colour": null },
            })
        );

        Ok(())
    }

    #[test]
    fn decode_fills_fields_missing_from_older_payloads() -> TestResult {
        let envelope: SnapshotEnvelope = serde_json::from_value(json!({
            "version": 1,
            "type": "catalog.resource",
            "entity_id": 3,
            "fields": { "label": "canoe" },
        }))?;

        let widget: Widget = envelope.decode()?;

        assert_eq!(
            widget,
            Widget {
                label: "canoe".to_string(),
                colour: None,
            }
        );

        Ok(())
    }

    #[test]
    fn decode_rejects_newer_versions() -> TestResult {
        let mut envelope = SnapshotEnvelope::capture(
            1,
            &Widget {
                label: "raft".to_string(),
                colour: None,
            },
        )?;
        envelope.version = SNAPSHOT_VERSION + 1;

        let result = envelope.decode::<Widget>();

        assert!(
            matches!(result, Err(SnapshotError::UnsupportedVersion { found }) if found == 2),
            "expected UnsupportedVersion, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn decode_rejects_other_kinds() -> TestResult {
        let envelope = SnapshotEnvelope::capture(
            1,
            &Gadget {
                label: "tent".to_string(),
            },
        )?;

        let result = envelope.decode::<Widget>();

        assert!(
            matches!(result, Err(SnapshotError::Mismatch { .. })),
            "expected Mismatch, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn capture_rejects_non_object_state() {
        let result = SnapshotEnvelope::capture(1, &Scalar(4));

        assert!(
            matches!(result, Err(SnapshotError::NotAnObject)),
            "expected NotAnObject, got {result:?}"
        );
    }
}
