//! Integration tests for folder operations.

mod helpers;

use cabinet_core::ErrorKind;
use cabinet_entity::DeleteOutcome;
use helpers::{TestApp, stream_of};

#[tokio::test]
async fn test_create_folder_at_root() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let folder = app.facade.create_folder(&token, "docs", None).await.unwrap();

    let expected = app.path(&["u1", "docs"]);
    assert_eq!(folder.folder_path, expected.display().to_string());
    assert_eq!(folder.user_id, "u1");
    assert!(folder.parent_folder_id.is_none());
    assert!(expected.is_dir());
    assert_eq!(TestApp::entries(&expected), 0);
}

#[tokio::test]
async fn test_created_folder_resolves_to_existing_directory() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let parent = app.facade.create_folder(&token, "projects", None).await.unwrap();
    let child = app
        .facade
        .create_folder(&token, "2024", Some(parent.id))
        .await
        .unwrap();

    let mut ctx = app.facade.begin(&token).await.unwrap();
    let resolved = ctx.resolve_folder_path(Some(child.id)).await.unwrap();
    ctx.rollback().await.unwrap();

    assert_eq!(resolved, app.path(&["u1", "projects", "2024"]));
    assert!(resolved.is_dir());
    assert_eq!(child.parent_folder_id, Some(parent.id));
}

#[tokio::test]
async fn test_create_under_missing_parent_fails() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let err = app
        .facade
        .create_folder(&token, "orphan", Some(9999))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::FolderNotFound);
    assert!(!app.path(&["u1", "orphan"]).exists());
}

#[tokio::test]
async fn test_duplicate_folder_name_fails_and_keeps_first() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let first = app.facade.create_folder(&token, "docs", None).await.unwrap();
    let err = app
        .facade
        .create_folder(&token, "docs", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderAlreadyExists);

    let listed = app.facade.list_child_folders(&token, None).await.unwrap();
    assert_eq!(listed, vec![first]);
    assert!(app.path(&["u1", "docs"]).is_dir());
}

#[tokio::test]
async fn test_concurrent_creators_exactly_one_wins() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let attempts = (0..4).map(|_| app.facade.create_folder(&token, "race", None));
    let results = futures::future::join_all(attempts).await;

    let won = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(won, 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert_eq!(err.kind, ErrorKind::FolderAlreadyExists);
    }
    assert_eq!(app.facade.list_child_folders(&token, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_folder_names_are_rejected() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    for bad in ["", "..", "a/b", "..\\x"] {
        let err = app.facade.create_folder(&token, bad, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{bad:?}");
    }
}

#[tokio::test]
async fn test_delete_folder_cascades_to_descendants() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let top = app.facade.create_folder(&token, "top", None).await.unwrap();
    let mid = app.facade.create_folder(&token, "mid", Some(top.id)).await.unwrap();
    let leaf = app.facade.create_folder(&token, "leaf", Some(mid.id)).await.unwrap();
    let file = app
        .facade
        .upload_file(&token, stream_of(b"deep"), "deep.txt", Some(leaf.id))
        .await
        .unwrap();

    let outcome = app.facade.delete_folder(&token, top.id).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);

    assert!(!app.path(&["u1", "top"]).exists());
    for id in [top.id, mid.id, leaf.id] {
        let mut ctx = app.facade.begin(&token).await.unwrap();
        let err = ctx.resolve_folder_path(Some(id)).await.unwrap_err();
        ctx.rollback().await.unwrap();
        assert_eq!(err.kind, ErrorKind::FolderNotFound);
    }
    let err = app.facade.get_file_path(&token, &file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);
}

#[tokio::test]
async fn test_delete_folder_twice_is_idempotent() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let folder = app.facade.create_folder(&token, "tmp", None).await.unwrap();

    assert_eq!(
        app.facade.delete_folder(&token, folder.id).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(
        app.facade.delete_folder(&token, folder.id).await.unwrap(),
        DeleteOutcome::NotFound
    );
    assert!(app.facade.list_child_folders(&token, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_folder_with_missing_directory_reports_already_gone() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let folder = app.facade.create_folder(&token, "vanished", None).await.unwrap();
    std::fs::remove_dir(app.path(&["u1", "vanished"])).unwrap();

    assert_eq!(
        app.facade.delete_folder(&token, folder.id).await.unwrap(),
        DeleteOutcome::AlreadyGone
    );
    assert!(app.facade.list_child_folders(&token, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_folder_removes_untracked_contents() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let folder = app.facade.create_folder(&token, "messy", None).await.unwrap();
    std::fs::write(app.path(&["u1", "messy", "stray.log"]), b"untracked").unwrap();

    assert_eq!(
        app.facade.delete_folder(&token, folder.id).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(!app.path(&["u1", "messy"]).exists());
}

#[tokio::test]
async fn test_list_child_folders_filters_by_parent() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let a = app.facade.create_folder(&token, "a", None).await.unwrap();
    let b = app.facade.create_folder(&token, "b", None).await.unwrap();
    let a1 = app.facade.create_folder(&token, "a1", Some(a.id)).await.unwrap();

    let roots = app.facade.list_child_folders(&token, None).await.unwrap();
    assert_eq!(roots.iter().map(|f| f.id).collect::<Vec<_>>(), vec![a.id, b.id]);

    let under_a = app.facade.list_child_folders(&token, Some(a.id)).await.unwrap();
    assert_eq!(under_a, vec![a1]);
}

#[tokio::test]
async fn test_folder_tree_nests_children() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let a = app.facade.create_folder(&token, "a", None).await.unwrap();
    let a1 = app.facade.create_folder(&token, "a1", Some(a.id)).await.unwrap();
    app.facade.create_folder(&token, "a1x", Some(a1.id)).await.unwrap();
    app.facade.create_folder(&token, "b", None).await.unwrap();

    let forest = app.facade.folder_tree(&token).await.unwrap();
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].folder.folder_name, "a");
    assert_eq!(forest[0].count(), 3);
    assert_eq!(forest[0].children[0].children[0].folder.folder_name, "a1x");
}

#[tokio::test]
async fn test_invalid_token_aborts_before_mutation() {
    let app = TestApp::new().await;

    let err = app
        .facade
        .create_folder("not-a-token", "docs", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(TestApp::entries(&app.root), 0);
}

#[tokio::test]
async fn test_health_check_reports_backends() {
    let app = TestApp::new().await;

    let report = app.facade.health_check().await.unwrap();

    assert!(report.is_healthy());
    assert_eq!(report.storage_provider, "local");
    assert_eq!(report.storage_root, app.root);
}
