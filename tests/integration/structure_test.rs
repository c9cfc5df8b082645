//! Integration tests for per-user structure records and assistant tools.

mod helpers;

use serde_json::json;

use foldermagic_core::error::ErrorKind;
use foldermagic_database::StructureStore;
use foldermagic_entity::action::{Action, DiffList};
use foldermagic_entity::structure::StructureState;

use helpers::{TestApp, folder_names, reorganize_diff};

const USER: &str = "alex@example.com";

#[tokio::test]
async fn test_snapshot_initialize_update_cycle() {
    let app = TestApp::new().await;
    let snapshot = app.snapshot().await;

    let record = app.structures.initialize(USER, snapshot.clone()).await.unwrap();
    assert_eq!(record.state(), StructureState::Initialized);

    let update = app.structures.update(USER, reorganize_diff()).await.unwrap();
    assert!(update.report.is_complete_success());
    assert_eq!(update.record.state(), StructureState::Updated);
    assert_eq!(update.record.current.as_ref(), Some(&snapshot));

    let proposed = update.record.proposed.unwrap();
    assert_eq!(folder_names(&proposed), vec!["Archive", "Finance", "Photos", "Work"]);
    assert!(proposed.find_folder("tmp_finance").is_some());

    // Re-initializing confirms a new snapshot and drops the proposal.
    let record = app.structures.initialize(USER, proposed).await.unwrap();
    assert!(!record.has_proposal());
    assert!(record.diff.is_none());
}

#[tokio::test]
async fn test_create_folder_proposal_is_read_back() {
    let app = TestApp::new().await;
    let snapshot = app.snapshot().await;
    app.structures.initialize(USER, snapshot.clone()).await.unwrap();

    let create = Action::create_folder("root", "Invoices").unwrap();
    let diff = DiffList::new(vec![create.clone()]).unwrap();
    app.structures.update(USER, diff).await.unwrap();

    let record = app.structures.read(USER).await.unwrap().unwrap();
    assert_eq!(record.current.as_ref(), Some(&snapshot));
    assert_eq!(record.diff.unwrap().iter().cloned().collect::<Vec<_>>(), vec![create]);

    let proposed = record.proposed.unwrap();
    let before: Vec<&str> = snapshot.folders().map(|f| f.id.as_str()).collect();
    let added: Vec<_> = proposed
        .folders()
        .filter(|f| !before.contains(&f.id.as_str()))
        .collect();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].name, "Invoices");
    assert_eq!(added[0].parent_id.as_deref(), Some("root"));
    assert!(added[0].files.is_empty() && added[0].children_folders.is_empty());
    assert_eq!(proposed.node_count(), snapshot.node_count() + 1);
}

#[tokio::test]
async fn test_update_without_initialize_writes_nothing() {
    let app = TestApp::new().await;

    let err = app.structures.update(USER, reorganize_diff()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Precondition);
    assert!(app.store.find(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_users_are_isolated() {
    let app = TestApp::new().await;
    let snapshot = app.snapshot().await;

    app.structures.initialize(USER, snapshot.clone()).await.unwrap();
    app.structures
        .initialize("sam@example.com", snapshot)
        .await
        .unwrap();
    app.structures.update(USER, reorganize_diff()).await.unwrap();

    let other = app.structures.read("sam@example.com").await.unwrap().unwrap();
    assert!(!other.has_proposal());
    assert_eq!(app.store.len(), 2);

    assert!(app.structures.delete(USER).await.unwrap());
    assert!(app.structures.read(USER).await.unwrap().is_none());
    assert!(!app.structures.delete(USER).await.unwrap());
}

#[tokio::test]
async fn test_tools_round_trip() {
    let app = TestApp::new().await;
    app.structures
        .initialize(USER, app.snapshot().await)
        .await
        .unwrap();

    let response = app
        .tools
        .propose_actions(json!({
            "proposals": [{
                "user_email": USER,
                "actions": { "actions": [
                    { "action_type": "create_folder", "parent_id": "root",
                      "name": "Docs", "placeholder_id": "tmp_docs" },
                    { "action_type": "move", "file_id": "f2", "target_parent_id": "tmp_docs" },
                    { "action_type": "move", "file_id": "missing", "target_parent_id": "root" }
                ]}
            }]
        }))
        .await
        .unwrap();

    let entry = &response["results"][0];
    assert_eq!(entry["status"], "success");
    assert_eq!(entry["applied"], 2);
    assert_eq!(entry["skipped"][0]["index"], 2);
    assert_eq!(
        entry["skipped"][0]["error_message"],
        "Entity not found in snapshot: missing"
    );

    let payload = app.tools.read_structure(USER).await.unwrap();
    assert!(payload["current"].is_object());
    assert_eq!(payload["diff"]["actions"].as_array().unwrap().len(), 3);
    let docs = payload["proposed"]["children_folders"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "Docs")
        .unwrap();
    assert_eq!(docs["files"][0]["id"], "f2");
}
