//! Schema definitions: typed configuration shapes, their defaults, and the
//! declarative field descriptors derived from them.

pub mod field;
pub mod identity;
pub mod preset;
pub mod website;
pub mod workflow;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::migration::{LegacyField, LegacyMarker};
use crate::domain::steps::StepPlan;
use crate::domain::{AppError, PipelineKind};

pub use field::{FieldDescriptor, FieldKind};
pub use identity::{CorporateIdentity, Hosting, HostingProvider, Tone};
pub use preset::{PresetConfig, PresetSchema};
pub use website::{WebsiteConfig, WebsiteSchema};
pub use workflow::{WorkflowConfig, WorkflowSchema};

/// An enum-valued field and the strings it accepts.
#[derive(Debug, Clone, Copy)]
pub struct EnumField {
    pub path: &'static [&'static str],
    pub allowed: &'static [&'static str],
}

/// A pipeline's configuration schema.
///
/// Implementors are zero-sized markers; the configuration itself is the
/// associated `Config` type whose `Default` is the resolved default document.
pub trait ConfigSchema: 'static {
    type Config: Serialize + DeserializeOwned + Default + Clone + PartialEq + fmt::Debug;

    const PIPELINE: PipelineKind;

    /// Enum-valued fields, checked by the sanitizer against their allowed set.
    const ENUM_FIELDS: &'static [EnumField];

    /// Legacy-only markers, evaluated in order.
    const LEGACY_MARKERS: &'static [LegacyMarker];

    /// Mapping of legacy flat fields into the nested shape, applied in order.
    const LEGACY_FIELDS: &'static [LegacyField];

    /// Wizard steps and their visibility groups.
    fn steps() -> &'static StepPlan<Self::Config>;

    /// Semantic checks beyond what deserialization enforces.
    fn validate(config: &Self::Config) -> Result<(), AppError>;
}

/// Fully-populated default configuration for a schema.
pub fn resolve_defaults<S: ConfigSchema>() -> S::Config {
    S::Config::default()
}

/// Descriptor tree for a schema, rooted at an unnamed object.
pub fn describe<S: ConfigSchema>() -> FieldDescriptor {
    let defaults = match serde_json::to_value(resolve_defaults::<S>()) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(pipeline = %S::PIPELINE, "default configuration is not serializable: {err}");
            serde_json::Value::Object(serde_json::Map::new())
        }
    };
    FieldDescriptor::from_default("", &defaults, &mut Vec::new(), S::ENUM_FIELDS)
}

/// Full-schema validator: shape via deserialization, then semantic checks.
pub fn validate_value<S: ConfigSchema>(value: &serde_json::Value) -> Result<S::Config, AppError> {
    let config: S::Config = serde_json::from_value(value.clone())?;
    S::validate(&config)?;
    Ok(config)
}

/// Check a colour is `#RGB` or `#RRGGBB`.
pub(crate) fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Declare a string-valued configuration enum.
///
/// Generates serde renames, `ALL`, `NAMES`, `as_str`, `from_name` and
/// `Default` so the enum table and the wire spelling cannot drift.
macro_rules! config_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident default $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const NAMES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $wire => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use config_enum;
