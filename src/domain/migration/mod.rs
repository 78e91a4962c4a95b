//! Legacy (v1) migration and the ingestion state machine.
//!
//! Every external blob enters through [`ingest`]: legacy shapes are migrated,
//! current shapes are validated directly and fall back to the import
//! sanitizer when validation fails.

mod detect;

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;

use crate::domain::coerce::{sanitize_against, sanitize_with, set_at, string_list, value_at};
use crate::domain::envelope;
use crate::domain::sanitize::{finalize, sanitize_imported_config};
use crate::domain::schema::{ConfigSchema, FieldDescriptor, FieldKind, describe, validate_value};

pub use detect::{Detection, LegacyMarker, LegacyReason, detect, is_legacy_shape};

/// How a legacy value is carried into its target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Copy, re-coerced against the target.
    Move,
    /// Push string(s) onto a list; the first write replaces the default list.
    AppendToList,
    /// Set a boolean from whether the legacy value is non-empty.
    PresenceFlag,
    /// Map legacy enum spellings (lower-cased) before the enum check.
    Rename(&'static [(&'static str, &'static str)]),
    /// Take the n-th string of a legacy list.
    Element(usize),
}

/// One row of a schema's legacy mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyField {
    pub from: &'static str,
    pub to: &'static [&'static str],
    pub transform: Transform,
}

impl LegacyField {
    pub const fn moved(from: &'static str, to: &'static [&'static str]) -> Self {
        Self { from, to, transform: Transform::Move }
    }

    pub const fn appended(from: &'static str, to: &'static [&'static str]) -> Self {
        Self { from, to, transform: Transform::AppendToList }
    }

    pub const fn flag(from: &'static str, to: &'static [&'static str]) -> Self {
        Self { from, to, transform: Transform::PresenceFlag }
    }

    pub const fn renamed(
        from: &'static str,
        to: &'static [&'static str],
        aliases: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { from, to, transform: Transform::Rename(aliases) }
    }

    pub const fn element(from: &'static str, index: usize, to: &'static [&'static str]) -> Self {
        Self { from, to, transform: Transform::Element(index) }
    }

    /// New value for the target field, or `None` to leave it alone.
    ///
    /// Apart from list appends, a target that no longer holds its default is
    /// never overwritten: values already in the nested shape win over flat
    /// legacy ones, and the first legacy rule to write a field wins.
    fn apply(
        &self,
        raw: &Value,
        current: &Value,
        target: &FieldDescriptor,
        first_write: bool,
    ) -> Option<Value> {
        let untouched = *current == target.default;
        match self.transform {
            Transform::AppendToList => {
                let incoming = match raw {
                    Value::String(_) => vec![raw.clone()],
                    _ => string_list(raw)?,
                };
                if incoming.is_empty() {
                    return None;
                }
                if first_write && untouched {
                    return Some(Value::Array(incoming));
                }
                let mut list = current.as_array().cloned().unwrap_or_default();
                for item in incoming {
                    if !list.contains(&item) {
                        list.push(item);
                    }
                }
                Some(Value::Array(list))
            }
            _ if !untouched => None,
            Transform::Move => Some(sanitize_against(Some(raw), current, target)),
            Transform::PresenceFlag => Some(Value::Bool(is_present(raw))),
            Transform::Rename(aliases) => {
                let name = raw.as_str()?.trim().to_lowercase().replace(' ', "-");
                let mapped = aliases
                    .iter()
                    .find(|(legacy, _)| *legacy == name)
                    .map(|(_, canonical)| canonical.to_string())
                    .unwrap_or(name);
                Some(sanitize_against(Some(&Value::String(mapped)), current, target))
            }
            Transform::Element(index) => {
                let picked = match raw {
                    Value::String(_) if index == 0 => raw.clone(),
                    Value::Array(items) => items.iter().filter(|item| item.is_string()).nth(index)?.clone(),
                    _ => return None,
                };
                Some(sanitize_against(Some(&picked), current, target))
            }
        }
    }
}

fn is_present(raw: &Value) -> bool {
    match raw {
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
        Value::Null => false,
    }
}

/// A top-level key that is already a nested block in the current shape.
///
/// An object only counts when it is empty or carries one of the block's own
/// field names; index-keyed objects are legacy lists and still migrate.
fn already_nested(descriptor: &FieldDescriptor, key: &str, raw: &Value) -> bool {
    match (descriptor.child(key).map(|field| &field.kind), raw) {
        (Some(FieldKind::Object { fields }), Value::Object(map)) => {
            map.is_empty() || map.keys().any(|name| fields.iter().any(|field| field.name == name.as_str()))
        }
        _ => false,
    }
}

/// Map a legacy blob into the current shape.
///
/// Starts from the sanitized overlay of the blob onto the defaults, so blocks
/// and fields that already have their current name survive, then applies the
/// schema's legacy table in order. The result always passes the schema's
/// semantic checks: a field that fails them is reset to its default.
pub fn migrate_legacy_to_v2<S: ConfigSchema>(raw: &Value) -> S::Config {
    let descriptor = describe::<S>();
    let (_, body) = envelope::split(raw);
    let mut migrated = sanitize_with(Some(&body), &descriptor);

    if let Value::Object(fields) = &body {
        let mut written: HashSet<&'static [&'static str]> = HashSet::new();
        for rule in S::LEGACY_FIELDS {
            let Some(raw_value) = fields.get(rule.from).filter(|value| !value.is_null()) else {
                continue;
            };
            if already_nested(&descriptor, rule.from, raw_value) {
                continue;
            }
            let Some(target) = descriptor.at(rule.to) else {
                tracing::warn!(pipeline = %S::PIPELINE, from = rule.from, "legacy rule targets an unknown field");
                continue;
            };
            let current = value_at(&migrated, rule.to).unwrap_or(&target.default);
            let first_write = !written.contains(&rule.to);
            if let Some(next) = rule.apply(raw_value, current, target, first_write) {
                tracing::debug!(
                    pipeline = %S::PIPELINE,
                    from = rule.from,
                    to = %rule.to.join("."),
                    "migrated legacy field"
                );
                set_at(&mut migrated, rule.to, next);
                written.insert(rule.to);
            }
        }

        let dropped: Vec<&str> = fields
            .keys()
            .map(String::as_str)
            .filter(|key| descriptor.child(key).is_none())
            .filter(|key| !S::LEGACY_FIELDS.iter().any(|rule| rule.from == *key))
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(pipeline = %S::PIPELINE, ?dropped, "legacy fields without a current equivalent");
        }
    }

    repair::<S>(migrated, &descriptor)
}

/// Reset fields reported by the semantic checks until the configuration
/// passes them.
fn repair<S: ConfigSchema>(mut value: Value, descriptor: &FieldDescriptor) -> S::Config {
    for _ in 0..descriptor.leaves().len() {
        let config: S::Config = match serde_json::from_value(value.clone()) {
            Ok(config) => config,
            Err(_) => break,
        };
        let Err(err) = S::validate(&config) else {
            return config;
        };
        let Some(path) = err.field_path() else {
            break;
        };
        let segments: Vec<&str> = path.split('.').collect();
        let Some(field) = descriptor.at(&segments) else {
            break;
        };
        if value_at(&value, &segments) == Some(&field.default) {
            break;
        }
        tracing::warn!(pipeline = %S::PIPELINE, field = path, "{err}; migrated value reset to default");
        set_at(&mut value, &segments, field.default.clone());
    }
    finalize::<S>(value)
}

/// Which branch of the ingestion state machine produced a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestRoute {
    /// Legacy shape, mapped by the migrator.
    Migrated,
    /// Current shape that validated as-is.
    Validated,
    /// Current shape rebuilt field by field after validation failed.
    Sanitized,
}

impl IngestRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestRoute::Migrated => "migrated",
            IngestRoute::Validated => "validated",
            IngestRoute::Sanitized => "sanitized",
        }
    }
}

impl fmt::Display for IngestRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of ingesting an external blob.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested<C> {
    pub config: C,
    pub route: IngestRoute,
    pub detection: Detection,
}

/// Turn any external blob into a configuration. Total.
pub fn ingest<S: ConfigSchema>(raw: &Value) -> Ingested<S::Config> {
    let detection = detect::<S>(raw);
    let (tag, body) = envelope::split(raw);
    if let Some(declared) = tag.pipeline.as_deref() {
        if tag.pipeline_kind() != Some(S::PIPELINE) {
            tracing::warn!(pipeline = %S::PIPELINE, declared, "ignoring mismatched type tag");
        }
    }

    let (config, route) = match &detection {
        Detection::Legacy(reason) => {
            tracing::debug!(pipeline = %S::PIPELINE, %reason, "migrating legacy configuration");
            (migrate_legacy_to_v2::<S>(&body), IngestRoute::Migrated)
        }
        Detection::Current => match validate_value::<S>(&body) {
            Ok(config) => (config, IngestRoute::Validated),
            Err(err) => {
                tracing::debug!(pipeline = %S::PIPELINE, "validation failed, sanitizing: {err}");
                (sanitize_imported_config::<S>(&body), IngestRoute::Sanitized)
            }
        },
    };
    tracing::debug!(pipeline = %S::PIPELINE, route = %route, "ingested configuration");
    Ingested { config, route, detection }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::preset::{AppType, DatabaseProvider};
    use crate::domain::schema::workflow::TriggerKind;
    use crate::domain::schema::{
        HostingProvider, PresetSchema, WebsiteSchema, WorkflowSchema, resolve_defaults,
    };
    use crate::testing::strategies::legacy_blob;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn empty_object_migrates_to_defaults() {
        let ingested = ingest::<PresetSchema>(&json!({}));
        assert_eq!(ingested.route, IngestRoute::Migrated);
        assert_eq!(ingested.config, resolve_defaults::<PresetSchema>());
    }

    #[test]
    fn flat_preset_moves_into_blocks() {
        let ingested = ingest::<PresetSchema>(&json!({"businessName": "Acme", "appType": "crm"}));
        assert!(ingested.detection.is_legacy());
        assert_eq!(ingested.config.meta.business_name, "Acme");
        assert_eq!(ingested.config.app.app_type, AppType::Crm);
    }

    #[test]
    fn preset_aliases_and_colors() {
        let config = migrate_legacy_to_v2::<PresetSchema>(&json!({
            "databaseType": "PostgreSQL",
            "hostingProvider": "Self",
            "primaryColor": "#112233",
            "secondaryColor": "#445566",
            "features": ["billing", 4, "chat"],
            "authProviders": ["google"],
            "unrelated": true
        }));
        assert_eq!(config.database.provider, DatabaseProvider::Postgres);
        assert_eq!(config.hosting.provider, HostingProvider::SelfHosted);
        assert_eq!(config.corporate_identity.brand_colors, vec!["#112233", "#445566"]);
        assert_eq!(config.features.feature_ids, vec!["billing", "chat"]);
        assert_eq!(config.auth.providers, vec!["google"]);
        assert!(config.auth.enabled);
    }

    #[test]
    fn empty_auth_providers_disable_auth() {
        let config = migrate_legacy_to_v2::<PresetSchema>(&json!({"authProviders": []}));
        assert!(!config.auth.enabled);
        assert!(PresetSchema::validate(&config).is_ok());
    }

    #[test]
    fn unknown_legacy_enum_keeps_default() {
        let config = migrate_legacy_to_v2::<PresetSchema>(&json!({"appType": "spaceship"}));
        assert_eq!(config.app.app_type, AppType::Saas);
    }

    #[test]
    fn workflow_legacy_shape() {
        let config = migrate_legacy_to_v2::<WorkflowSchema>(&json!({
            "workflowName": "Nightly export",
            "triggerType": "cron",
            "schedule": "0 2 * * *",
            "notifications": ["slack"],
            "notifyEmail": "ops@example.com",
            "maxRetries": 5
        }));
        assert_eq!(config.meta.name, "Nightly export");
        assert_eq!(config.trigger.kind, TriggerKind::Schedule);
        assert_eq!(config.trigger.cron, "0 2 * * *");
        assert_eq!(config.notifications.channels, vec!["slack"]);
        assert_eq!(config.notifications.recipients, vec!["ops@example.com"]);
        assert!(config.notifications.enabled);
        assert_eq!(config.error_handling.retries, 5);
    }

    #[test]
    fn invalid_migrated_fields_are_reset() {
        let config = migrate_legacy_to_v2::<WorkflowSchema>(&json!({
            "workflowName": "x",
            "trigger": "scheduled",
            "schedule": "daily",
            "maxRetries": 50
        }));
        assert_eq!(config.trigger.kind, TriggerKind::Schedule);
        assert_eq!(config.trigger.cron, "0 9 * * 1");
        assert_eq!(config.error_handling.retries, 3);
        assert!(WorkflowSchema::validate(&config).is_ok());
    }

    #[test]
    fn invalid_brand_color_string_falls_back() {
        let ingested = ingest::<WebsiteSchema>(&json!({"brandColors": "#zzzzzz"}));
        assert_eq!(
            ingested.config.corporate_identity.brand_colors,
            resolve_defaults::<WebsiteSchema>().corporate_identity.brand_colors
        );
    }

    #[test]
    fn website_legacy_shape() {
        let config = migrate_legacy_to_v2::<WebsiteSchema>(&json!({
            "businessName": "Bakery",
            "websiteType": "e-commerce",
            "fonts": ["Roboto", "Lora"],
            "paymentMethods": {"0": "paypal"},
            "pages": ["home", "shop"]
        }));
        assert_eq!(config.meta.business_name, "Bakery");
        assert_eq!(config.website_types, vec!["e-commerce"]);
        assert_eq!(config.corporate_identity.primary_font, "Roboto");
        assert_eq!(config.corporate_identity.secondary_font, "Lora");
        assert_eq!(config.commerce.payment_providers, vec!["paypal"]);
        assert_eq!(config.pages.selected, vec!["home", "shop"]);
    }

    #[test]
    fn index_keyed_feature_list_migrates() {
        let config = migrate_legacy_to_v2::<PresetSchema>(&json!({
            "businessName": "Acme",
            "features": {"0": "billing", "1": "chat"}
        }));
        assert_eq!(config.features.feature_ids, vec!["billing", "chat"]);
    }

    #[test]
    fn index_keyed_page_list_migrates() {
        let config = migrate_legacy_to_v2::<WebsiteSchema>(&json!({
            "businessName": "Bakery",
            "pages": {"0": "home"}
        }));
        assert!(config.pages.selected.iter().any(|page| page == "home"));
    }

    #[test]
    fn index_keyed_notification_list_migrates() {
        let config = migrate_legacy_to_v2::<WorkflowSchema>(&json!({
            "workflowName": "Deploy",
            "notifications": {"0": "slack"}
        }));
        assert_eq!(config.notifications.channels, vec!["slack"]);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn misclassified_current_object_keeps_its_fields() {
        let mut original = resolve_defaults::<PresetSchema>();
        original.meta.business_name = "Kept".to_string();
        original.features.feature_ids = vec!["billing".to_string()];
        original.database.provider = DatabaseProvider::Sqlite;
        let mut raw = serde_json::to_value(&original).unwrap();
        raw["businessName"] = json!("Stray");

        let ingested = ingest::<PresetSchema>(&raw);
        assert_eq!(ingested.route, IngestRoute::Migrated);
        assert_eq!(ingested.config, original);
    }

    #[test]
    fn valid_current_object_is_validated() {
        let mut original = resolve_defaults::<WorkflowSchema>();
        original.meta.name = "Deploy".to_string();
        let mut raw = serde_json::to_value(&original).unwrap();
        raw["type"] = json!("workflow");
        raw["version"] = json!("2.0.0");

        let ingested = ingest::<WorkflowSchema>(&raw);
        assert_eq!(ingested.route, IngestRoute::Validated);
        assert_eq!(ingested.config, original);
    }

    #[test]
    fn unknown_field_routes_through_sanitizer() {
        let mut original = resolve_defaults::<PresetSchema>();
        original.meta.business_name = "Acme".to_string();
        let mut raw = serde_json::to_value(&original).unwrap();
        raw["madeUpField"] = json!(123);

        let ingested = ingest::<PresetSchema>(&raw);
        assert_eq!(ingested.route, IngestRoute::Sanitized);
        assert_eq!(ingested.config, original);
        let value = serde_json::to_value(&ingested.config).unwrap();
        assert!(value.get("madeUpField").is_none());
    }

    #[test]
    fn mismatched_type_tag_is_ignored() {
        let mut raw = serde_json::to_value(resolve_defaults::<WebsiteSchema>()).unwrap();
        raw["type"] = json!("preset");
        let ingested = ingest::<WebsiteSchema>(&raw);
        assert_eq!(ingested.route, IngestRoute::Validated);
    }

    fn migrated_value_validates<S: ConfigSchema>(raw: &Value) -> Result<(), TestCaseError> {
        let config = migrate_legacy_to_v2::<S>(raw);
        let value = serde_json::to_value(&config).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(validate_value::<S>(&value).is_ok(), "{} migration invalid: {}", S::PIPELINE, value);
        Ok(())
    }

    proptest! {
        #[test]
        fn preset_migration_always_validates(raw in legacy_blob(PresetSchema::LEGACY_FIELDS)) {
            migrated_value_validates::<PresetSchema>(&raw)?;
        }

        #[test]
        fn workflow_migration_always_validates(raw in legacy_blob(WorkflowSchema::LEGACY_FIELDS)) {
            migrated_value_validates::<WorkflowSchema>(&raw)?;
        }

        #[test]
        fn website_migration_always_validates(raw in legacy_blob(WebsiteSchema::LEGACY_FIELDS)) {
            migrated_value_validates::<WebsiteSchema>(&raw)?;
        }
    }
}
