mod common;

use common::TestContext;
use confwiz::{
    ConfigId, ConfigStore, FilesystemConfigStore, IngestRoute, PipelineKind, PresetSchema,
    StoredConfig, WebsiteSchema, Wizard, WizardOptions, ingest, list_at, resolve_defaults,
    sanitize_imported_config, save_at, show_at, tool_config,
};
use serde_json::json;
use serial_test::serial;

#[test]
fn public_api_lifecycle_contract() {
    let ctx = TestContext::new();
    let root = ctx.work_dir().to_path_buf();

    let saved = save_at(root.clone(), PipelineKind::Website, &json!({"businessName": "Bakery"}), None)
        .expect("save failed");
    assert_eq!(saved.route, IngestRoute::Migrated);

    let stored = show_at(root.clone(), &saved.id, Some(PipelineKind::Website)).expect("show failed");
    assert_eq!(stored.config["meta"]["businessName"], "Bakery");

    let entries = list_at(root, Some(PipelineKind::Website)).expect("list failed");
    assert_eq!(entries.len(), 1);
}

#[test]
fn stored_documents_reimport_unchanged() {
    let ctx = TestContext::new();
    let store = FilesystemConfigStore::new(ctx.store_dir());

    let imported = ingest::<PresetSchema>(&json!({"businessName": "Acme", "appType": "crm"}));
    let stored = StoredConfig::new(PipelineKind::Preset, &imported.config).unwrap();
    let id = store.save(None, &stored).unwrap();

    let loaded = store.load(&id).unwrap();
    let again = ingest::<PresetSchema>(&loaded.to_document().unwrap());
    assert_eq!(again.route, IngestRoute::Validated);
    assert_eq!(again.config, imported.config);
}

#[test]
fn wizard_is_usable_from_outside_the_crate() {
    let mut wizard = Wizard::<WebsiteSchema>::new(WizardOptions::default());
    assert!(wizard.update(&json!({"websiteTypes": ["e-commerce"]})));
    assert!(wizard.visible_steps().contains(&12));
    let done = wizard.complete();
    assert_eq!(sanitize_imported_config::<WebsiteSchema>(&serde_json::to_value(&done).unwrap()), done);
    assert_ne!(done, resolve_defaults::<WebsiteSchema>());
}

#[test]
#[serial]
fn tool_config_reads_the_current_directory() {
    let ctx = TestContext::new();
    ctx.write_tool_config("[wizard]\ndefault_pipeline = \"workflow\"\n");
    let config = ctx.with_work_dir(tool_config).expect("tool config should load");
    assert_eq!(config.wizard.default_pipeline, PipelineKind::Workflow);
}

#[test]
fn config_ids_reject_traversal() {
    assert!("../escape".parse::<ConfigId>().is_err());
    assert!("preset-1".parse::<ConfigId>().is_ok());
}
