//! Import sanitizer: rebuild a configuration field by field from untrusted JSON.

use serde_json::Value;

use crate::domain::coerce::sanitize_with;
use crate::domain::envelope;
use crate::domain::schema::{ConfigSchema, describe};

/// Coerce every field of `raw` against the schema defaults.
///
/// Never fails. A result that still violates the schema's semantic checks is
/// returned as-is after a warning, so a bad import keeps as many fields as
/// legally possible instead of blocking the user.
pub fn sanitize_imported_config<S: ConfigSchema>(raw: &Value) -> S::Config {
    let (_, body) = envelope::split(raw);
    let sanitized = sanitize_with(Some(&body), &describe::<S>());
    finalize::<S>(sanitized)
}

/// Deserialize an already-coerced value, keeping it when semantic checks fail.
pub(crate) fn finalize<S: ConfigSchema>(value: Value) -> S::Config {
    match serde_json::from_value::<S::Config>(value) {
        Ok(config) => {
            if let Err(err) = S::validate(&config) {
                tracing::warn!(pipeline = %S::PIPELINE, "keeping sanitized configuration that fails validation: {err}");
            }
            config
        }
        Err(err) => {
            tracing::warn!(pipeline = %S::PIPELINE, "sanitized configuration does not deserialize, using defaults: {err}");
            S::Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::preset::AppType;
    use crate::domain::migration::ingest;
    use crate::domain::schema::{PresetSchema, WebsiteSchema, WorkflowSchema, resolve_defaults};
    use crate::testing::strategies::{arb_json, legacy_blob};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(sanitize_imported_config::<PresetSchema>(&json!({})), resolve_defaults::<PresetSchema>());
        assert_eq!(sanitize_imported_config::<WebsiteSchema>(&json!({})), resolve_defaults::<WebsiteSchema>());
    }

    #[test]
    fn non_object_yields_defaults() {
        assert_eq!(sanitize_imported_config::<WorkflowSchema>(&json!([1, 2])), resolve_defaults::<WorkflowSchema>());
        assert_eq!(sanitize_imported_config::<WorkflowSchema>(&Value::Null), resolve_defaults::<WorkflowSchema>());
    }

    #[test]
    fn sub_block_fields_merge_onto_defaults() {
        let config = sanitize_imported_config::<PresetSchema>(&json!({"auth": {"mfa": true}}));
        assert!(config.auth.mfa);
        assert!(config.auth.enabled);
        assert_eq!(config.auth.roles, vec!["admin", "user"]);
    }

    #[test]
    fn enum_outside_allowed_set_falls_back() {
        let config = sanitize_imported_config::<PresetSchema>(&json!({"app": {"appType": "spaceship"}}));
        assert_eq!(config.app.app_type, AppType::Saas);
    }

    #[test]
    fn semantic_failure_keeps_sanitized_value() {
        let config = sanitize_imported_config::<WebsiteSchema>(&json!({"commerce": {"currency": "euro"}}));
        assert_eq!(config.commerce.currency, "euro");
        assert!(WebsiteSchema::validate(&config).is_err());
    }

    #[test]
    fn export_then_import_is_identity() {
        let mut original = resolve_defaults::<WebsiteSchema>();
        original.website_types = vec!["blog".to_string(), "shop".to_string()];
        original.blog.posts_per_page = 25;
        original.seo.keywords = vec!["bread".to_string()];
        let text = serde_json::to_string(&original).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(sanitize_imported_config::<WebsiteSchema>(&reparsed), original);
    }

    fn sanitized_matches_schema<S: ConfigSchema>(raw: &Value) -> Result<(), TestCaseError> {
        let config = sanitize_imported_config::<S>(raw);
        let value = serde_json::to_value(&config).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(describe::<S>().matches(&value));
        prop_assert!(serde_json::from_value::<S::Config>(value).is_ok());
        Ok(())
    }

    fn export_round_trips<S: ConfigSchema>(config: &S::Config) -> Result<(), TestCaseError> {
        let exported = serde_json::to_value(config).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(&sanitize_imported_config::<S>(&exported), config);
        Ok(())
    }

    proptest! {
        #[test]
        fn sanitized_configs_survive_export(raw in arb_json()) {
            export_round_trips::<PresetSchema>(&sanitize_imported_config::<PresetSchema>(&raw))?;
            export_round_trips::<WorkflowSchema>(&sanitize_imported_config::<WorkflowSchema>(&raw))?;
            export_round_trips::<WebsiteSchema>(&sanitize_imported_config::<WebsiteSchema>(&raw))?;
        }

        #[test]
        fn migrated_configs_survive_export(
            preset in legacy_blob(PresetSchema::LEGACY_FIELDS),
            workflow in legacy_blob(WorkflowSchema::LEGACY_FIELDS),
            website in legacy_blob(WebsiteSchema::LEGACY_FIELDS),
        ) {
            export_round_trips::<PresetSchema>(&ingest::<PresetSchema>(&preset).config)?;
            export_round_trips::<WorkflowSchema>(&ingest::<WorkflowSchema>(&workflow).config)?;
            export_round_trips::<WebsiteSchema>(&ingest::<WebsiteSchema>(&website).config)?;
        }

        #[test]
        fn sanitizer_is_total(raw in arb_json()) {
            sanitized_matches_schema::<PresetSchema>(&raw)?;
            sanitized_matches_schema::<WorkflowSchema>(&raw)?;
            sanitized_matches_schema::<WebsiteSchema>(&raw)?;
        }

        #[test]
        fn nested_garbage_keeps_shape(raw in prop::collection::hash_map(
            prop::sample::select(vec!["meta", "auth", "database", "ui", "hosting", "features"]),
            arb_json(),
            0..6,
        )) {
            let raw = Value::Object(raw.into_iter().map(|(key, value)| (key.to_string(), value)).collect());
            sanitized_matches_schema::<PresetSchema>(&raw)?;
        }
    }
}
