mod common;

use common::TestContext;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn show_cannot_read_outside_the_store() {
    let ctx = TestContext::new();
    std::fs::write(ctx.work_dir().join("secret.json"), "{\"type\":\"preset\",\"version\":\"2.0.0\"}")
        .unwrap();

    ctx.cli()
        .args(["show", "../secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("../secret"));
}

#[test]
fn save_cannot_write_outside_the_store() {
    let ctx = TestContext::new();
    let file = ctx.write_json("in.json", &json!({}));

    ctx.cli().args(["save", "preset", "--id", "../../escape"]).arg(&file).assert().failure();

    assert!(!ctx.work_dir().join("escape.json").exists());
    assert!(ctx.stored_ids(&ctx.store_dir()).is_empty());
}
