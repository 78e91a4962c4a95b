//! Shared testing utilities for confwiz CLI tests.

use assert_cmd::Command;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated working directory for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Path to the directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Default store directory inside the work directory.
    pub fn store_dir(&self) -> PathBuf {
        self.work_dir.join(".confwiz")
    }

    /// Build a command for invoking the compiled `confwiz` binary within the work directory.
    pub fn cli(&self) -> Command {
        self.cli_in(self.work_dir())
    }

    pub fn cli_in<P: AsRef<Path>>(&self, dir: P) -> Command {
        let mut cmd = Command::cargo_bin("confwiz").expect("Failed to locate confwiz binary");
        cmd.current_dir(dir.as_ref()).env_remove("CONFWIZ_LOG");
        cmd
    }

    /// Write `value` as JSON under the work directory and return its path.
    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(value).expect("Failed to encode JSON"))
            .expect("Failed to write JSON fixture");
        path
    }

    pub fn write_tool_config(&self, content: &str) {
        fs::write(self.work_dir.join("confwiz.toml"), content).expect("Failed to write confwiz.toml");
    }

    pub fn read_json(&self, path: &Path) -> Value {
        let content = fs::read_to_string(path).expect("Failed to read JSON file");
        serde_json::from_str(&content).expect("File should contain JSON")
    }

    /// Ids of the documents in a store directory.
    pub fn stored_ids(&self, store: &Path) -> Vec<String> {
        let Ok(entries) = fs::read_dir(store) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry.path().file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
            })
            .collect();
        ids.sort();
        ids
    }

    /// Execute a closure after temporarily switching into the work directory.
    pub fn with_work_dir<F, R>(&self, action: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::current_dir().expect("Failed to capture current dir");
        env::set_current_dir(&self.work_dir).expect("Failed to switch current dir");
        let result = action();
        env::set_current_dir(original).expect("Failed to restore current dir");
        result
    }
}
