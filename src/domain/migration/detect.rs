//! Legacy shape detection.

use std::fmt;

use serde_json::{Map, Value};

use crate::domain::envelope;
use crate::domain::schema::ConfigSchema;
use crate::domain::version::{Generation, SchemaVersion};

/// Structural hint that a blob predates the nested shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyMarker {
    /// Legacy-only flat key is present.
    Field(&'static str),
    /// Array where the nested shape has an object.
    ListInPlaceOfBlock(&'static str),
    /// String where the nested shape has an object.
    ScalarInPlaceOfBlock(&'static str),
    /// Block that only the nested shape has is absent.
    MissingBlock(&'static str),
}

impl LegacyMarker {
    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        match self {
            LegacyMarker::Field(name) => body.contains_key(*name),
            LegacyMarker::ListInPlaceOfBlock(name) => body.get(*name).is_some_and(Value::is_array),
            LegacyMarker::ScalarInPlaceOfBlock(name) => {
                body.get(*name).is_some_and(Value::is_string)
            }
            LegacyMarker::MissingBlock(name) => !body.get(*name).is_some_and(Value::is_object),
        }
    }
}

impl fmt::Display for LegacyMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyMarker::Field(name) => write!(f, "legacy field '{}' present", name),
            LegacyMarker::ListInPlaceOfBlock(name) => write!(f, "'{}' is a list, not a block", name),
            LegacyMarker::ScalarInPlaceOfBlock(name) => {
                write!(f, "'{}' is a string, not a block", name)
            }
            LegacyMarker::MissingBlock(name) => write!(f, "block '{}' missing", name),
        }
    }
}

/// Why a blob was classified as legacy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyReason {
    /// Explicit version tag from the first generation.
    VersionTag(SchemaVersion),
    /// First marker that matched, in declaration order.
    Marker(LegacyMarker),
    /// Top level is not an object at all.
    NotAnObject,
}

impl fmt::Display for LegacyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyReason::VersionTag(version) => write!(f, "tagged with version {}", version),
            LegacyReason::Marker(marker) => write!(f, "{}", marker),
            LegacyReason::NotAnObject => f.write_str("top level is not an object"),
        }
    }
}

/// Outcome of legacy detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Current,
    Legacy(LegacyReason),
}

impl Detection {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Detection::Legacy(_))
    }

    pub fn generation(&self) -> Generation {
        if self.is_legacy() { Generation::V1 } else { Generation::V2 }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Current => f.write_str("current (v2)"),
            Detection::Legacy(reason) => write!(f, "legacy (v1): {}", reason),
        }
    }
}

/// Classify a raw blob.
///
/// An explicit first-generation tag wins. Otherwise the schema's markers are
/// checked in order and the first hit is reported.
pub fn detect<S: ConfigSchema>(raw: &Value) -> Detection {
    let (tag, body) = envelope::split(raw);
    let Value::Object(body) = body else {
        return Detection::Legacy(LegacyReason::NotAnObject);
    };
    if let Some(version) = tag.version.filter(|version| version.generation() == Generation::V1) {
        return Detection::Legacy(LegacyReason::VersionTag(version));
    }
    S::LEGACY_MARKERS
        .iter()
        .find(|marker| marker.matches(&body))
        .map(|marker| Detection::Legacy(LegacyReason::Marker(*marker)))
        .unwrap_or(Detection::Current)
}

pub fn is_legacy_shape<S: ConfigSchema>(raw: &Value) -> bool {
    detect::<S>(raw).is_legacy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{PresetSchema, WebsiteSchema, WorkflowSchema, resolve_defaults};
    use serde_json::json;

    fn current<S: ConfigSchema>() -> Value {
        serde_json::to_value(resolve_defaults::<S>()).unwrap()
    }

    #[test]
    fn canonical_defaults_are_current() {
        assert_eq!(detect::<PresetSchema>(&current::<PresetSchema>()), Detection::Current);
        assert_eq!(detect::<WorkflowSchema>(&current::<WorkflowSchema>()), Detection::Current);
        assert_eq!(detect::<WebsiteSchema>(&current::<WebsiteSchema>()), Detection::Current);
    }

    #[test]
    fn flat_preset_fields_are_legacy() {
        let detection = detect::<PresetSchema>(&json!({"businessName": "Acme", "appType": "crm"}));
        assert_eq!(
            detection,
            Detection::Legacy(LegacyReason::Marker(LegacyMarker::Field("businessName")))
        );
    }

    #[test]
    fn features_list_is_legacy_even_with_meta() {
        let raw = json!({"meta": {}, "features": ["billing"]});
        assert_eq!(
            detect::<PresetSchema>(&raw),
            Detection::Legacy(LegacyReason::Marker(LegacyMarker::ListInPlaceOfBlock("features")))
        );
    }

    #[test]
    fn workflow_string_trigger_is_legacy() {
        let raw = json!({"meta": {}, "trigger": "cron"});
        assert!(is_legacy_shape::<WorkflowSchema>(&raw));
    }

    #[test]
    fn v1_tag_wins_over_shape() {
        let mut raw = current::<PresetSchema>();
        raw["version"] = json!("1.4.0");
        assert!(matches!(
            detect::<PresetSchema>(&raw),
            Detection::Legacy(LegacyReason::VersionTag(_))
        ));
    }

    #[test]
    fn v2_tag_still_yields_to_markers() {
        let raw = json!({"type": "preset", "version": "2.0.0", "appType": "crm"});
        assert!(is_legacy_shape::<PresetSchema>(&raw));
    }

    #[test]
    fn scalar_input_is_legacy() {
        assert_eq!(
            detect::<WebsiteSchema>(&Value::Null),
            Detection::Legacy(LegacyReason::NotAnObject)
        );
    }

    #[test]
    fn missing_meta_block_is_legacy() {
        assert!(is_legacy_shape::<WebsiteSchema>(&json!({})));
        assert!(is_legacy_shape::<WebsiteSchema>(&json!({"meta": "flat"})));
    }
}
