//! Integration tests driving the `foldermagic` binary.

mod helpers;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

use helpers::sample_tree;

/// Scratch directory holding fixtures; also the working directory of each run
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let fixture = Self { dir };
        fixture.write("tree.json", &serde_json::to_value(sample_tree()).unwrap());
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap())
            .expect("Failed to write fixture");
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_foldermagic"))
            .current_dir(self.dir.path())
            .arg("--config")
            .arg(self.path("missing.toml"))
            .args(args)
            .env("FOLDERMAGIC_ENV", "test")
            .env("FOLDERMAGIC__REMOTE__MEMORY__SEED_PATH", self.path("tree.json"))
            .env("FOLDERMAGIC__LOGGING__LEVEL", "warn")
            .output()
            .expect("Failed to run foldermagic")
    }
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_preview_json() {
    let fx = Fixture::new();
    let diff = fx.write(
        "diff.json",
        &json!({ "actions": [
            { "action_type": "rename", "entity_id": "f2", "new_name": "todo.md" },
            { "action_type": "move", "entity_id": "root", "target_parent_id": "w" }
        ]}),
    );

    let output = fx.run(&[
        "--format",
        "json",
        "preview",
        "--current",
        arg(&fx.path("tree.json")),
        "--diff",
        arg(&diff),
    ]);
    let value = stdout_json(&output);

    assert_eq!(value["report"]["total"], 2);
    assert_eq!(value["report"]["succeeded"], 1);
    assert_eq!(
        value["report"]["outcomes"][1]["error_message"],
        "Root folder cannot be renamed or moved: root"
    );
    let renamed = value["tree"]["files"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["id"] == "f2" && f["name"] == "todo.md");
    assert!(renamed);
}

#[test]
fn test_apply_json_against_seeded_remote() {
    let fx = Fixture::new();
    let diff = fx.write(
        "diff.json",
        &json!({ "actions": [
            { "action_type": "create_folder", "target_parent_id": "root",
              "new_name": "Finance", "placeholder_id": "tmp" },
            { "action_type": "move", "entity_id": "f1", "target_parent_id": "tmp" },
            { "action_type": "rename", "entity_id": "nope", "new_name": "x" }
        ]}),
    );

    let value = stdout_json(&fx.run(&["--format", "json", "apply", "--diff", arg(&diff)]));

    assert_eq!(value["total"], 3);
    assert_eq!(value["succeeded"], 2);
    assert_eq!(value["failed"], 1);
    assert!(value["outcomes"][0]["new_entity_id"].is_string());
    assert_eq!(value["outcomes"][1]["entity_id"], "f1");
    assert_eq!(value["outcomes"][2]["error_code"], "404");
}

#[test]
fn test_snapshot_to_file() {
    let fx = Fixture::new();
    let out = fx.path("snapshot.json");

    let output = fx.run(&["snapshot", "--root", "root", "--depth", "1", "--output", arg(&out)]);
    assert!(output.status.success());

    let tree: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(tree["id"], "root");
    assert_eq!(tree["files"].as_array().unwrap().len(), 2);
    for folder in tree["children_folders"].as_array().unwrap() {
        assert!(folder["files"].as_array().unwrap().is_empty());
    }
}

#[test]
fn test_structure_init_then_update_requires_record() {
    let fx = Fixture::new();

    let value = stdout_json(&fx.run(&[
        "--format",
        "json",
        "structure",
        "init",
        "--user",
        "alex@example.com",
        "--from-remote",
        "root",
    ]));
    assert_eq!(value["user_key"], "alex@example.com");
    assert!(value["proposed"].is_null());

    // The in-memory structure store does not outlive the process.
    let diff = fx.write("diff.json", &json!({ "actions": [] }));
    let output = fx.run(&[
        "structure",
        "update",
        "--user",
        "alex@example.com",
        "--diff",
        arg(&diff),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not initialized"));
}

#[test]
fn test_invalid_diff_file_fails() {
    let fx = Fixture::new();
    let diff = fx.write(
        "diff.json",
        &json!({ "actions": [{ "action_type": "delete", "entity_id": "f1" }] }),
    );

    let output = fx.run(&["apply", "--diff", arg(&diff)]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_memory_structure_store_prints_hint() {
    let fx = Fixture::new();

    let output = fx.run(&["structure", "delete", "--user", "alex@example.com"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Structure store is in-memory"));
    assert!(stdout.contains("No structure stored"));

    // JSON output stays parseable; the hint only goes to the log.
    let value = stdout_json(&fx.run(&[
        "--format",
        "json",
        "structure",
        "delete",
        "--user",
        "alex@example.com",
    ]));
    assert_eq!(value["removed"], false);
}
