//! Integration tests for remote application and offline projection.

mod helpers;

use foldermagic_core::traits::remote::RemoteError;
use foldermagic_entity::action::{Action, DiffList};
use foldermagic_service::project;

use helpers::{TestApp, file_names, folder_names, reorganize_diff, sample_tree};

#[tokio::test]
async fn test_snapshot_mirrors_remote() {
    let app = TestApp::new().await;
    let snapshot = app.snapshot().await;

    assert_eq!(snapshot.node_count(), sample_tree().node_count());
    assert_eq!(folder_names(&snapshot), vec!["Photos", "Work"]);
    assert_eq!(file_names(&snapshot), vec!["budget.xlsx", "notes.txt"]);
    snapshot.validate().unwrap();
}

#[tokio::test]
async fn test_apply_then_snapshot_matches_projection() {
    let app = TestApp::new().await;
    let diff = reorganize_diff();

    let before = app.snapshot().await;
    let projection = project(&before, &diff);
    assert!(projection.report.is_complete_success());

    let result = app.dispatcher.apply(&diff).await.unwrap();
    assert!(result.is_complete_success(), "{result:?}");
    assert_eq!(result.total, 4);

    // The placeholder is split from its first reference.
    assert_eq!(app.remote.batch_sizes().await, vec![1, 3]);

    let after = app.snapshot().await;
    assert_eq!(after.node_count(), projection.tree.node_count());
    assert_eq!(folder_names(&after), folder_names(&projection.tree));
    assert_eq!(file_names(&after), file_names(&projection.tree));
    assert_eq!(folder_names(&after), vec!["Archive", "Finance", "Photos", "Work"]);
    assert_eq!(file_names(&after), vec!["meeting-notes.txt"]);

    let finance_id = result.outcomes[0].new_entity_id.clone().unwrap();
    let finance = after.find_folder(&finance_id).unwrap();
    assert_eq!(file_names(finance), vec!["budget.xlsx"]);
    assert!(after.find_folder("w").unwrap().find_folder("a").is_none());
}

#[tokio::test]
async fn test_partial_failure_leaves_other_actions_applied() {
    let app = TestApp::new().await;
    let diff = DiffList::new(vec![
        Action::rename("f3", "summary.docx").unwrap(),
        Action::move_entity("ghost", "w").unwrap(),
        Action::move_entity("w", "a").unwrap(),
        Action::rename("f5", "sunset.jpg").unwrap(),
    ])
    .unwrap();

    let result = app.dispatcher.apply(&diff).await.unwrap();
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 2);
    assert!(result.outcomes[0].success);
    assert!(!result.outcomes[1].success);
    assert!(!result.outcomes[2].success);
    assert!(result.outcomes[3].success);

    let after = app.snapshot().await;
    assert_eq!(after.find_file("f3").unwrap().name, "summary.docx");
    assert_eq!(after.find_file("f5").unwrap().name, "sunset.jpg");
    assert_eq!(folder_names(&after), vec!["Photos", "Work"]);
}

#[tokio::test]
async fn test_rejected_batch_fails_every_action_in_it() {
    let app = TestApp::new().await;
    app.remote.fail_next_batch(RemoteError::rate_limited("User rate limit exceeded")).await;

    let diff = DiffList::new(vec![
        Action::rename("f1", "a.xlsx").unwrap(),
        Action::rename("f2", "b.txt").unwrap(),
    ])
    .unwrap();
    let result = app.dispatcher.apply(&diff).await.unwrap();

    assert_eq!(result.failed, 2);
    assert!(result.outcomes.iter().all(|o| !o.success));

    let after = app.snapshot().await;
    assert_eq!(file_names(&after), vec!["budget.xlsx", "notes.txt"]);
}

#[tokio::test]
async fn test_projection_does_not_touch_remote() {
    let app = TestApp::new().await;
    let before = app.snapshot().await;

    let projection = project(&before, &reorganize_diff());
    assert_eq!(folder_names(&projection.tree).len(), 4);

    assert!(app.remote.batch_sizes().await.is_empty());
    assert_eq!(app.snapshot().await, before);
}
