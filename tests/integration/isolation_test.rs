//! Integration tests for per-user isolation.

mod helpers;

use cabinet_core::ErrorKind;
use cabinet_entity::DeleteOutcome;
use helpers::{TestApp, stream_of};

#[tokio::test]
async fn test_users_get_separate_roots() {
    let app = TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");

    let a = app.facade.create_folder(&alice, "docs", None).await.unwrap();
    let b = app.facade.create_folder(&bob, "docs", None).await.unwrap();

    assert_ne!(a.id, b.id);
    assert!(app.path(&["alice", "docs"]).is_dir());
    assert!(app.path(&["bob", "docs"]).is_dir());
}

#[tokio::test]
async fn test_foreign_folder_is_indistinguishable_from_missing() {
    let app = TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");

    let private = app.facade.create_folder(&alice, "private", None).await.unwrap();

    let err = app
        .facade
        .list_child_folders(&bob, Some(private.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);
    let missing = app
        .facade
        .list_child_folders(&bob, Some(private.id + 1000))
        .await
        .unwrap_err();
    assert_eq!(missing.kind, err.kind);

    let err = app.facade.list_files(&bob, Some(private.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);

    let err = app
        .facade
        .create_folder(&bob, "intruder", Some(private.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderNotFound);
    assert!(!app.path(&["alice", "private", "intruder"]).exists());

    assert_eq!(
        app.facade.delete_folder(&bob, private.id).await.unwrap(),
        DeleteOutcome::NotFound
    );
    assert!(app.path(&["alice", "private"]).is_dir());
}

#[tokio::test]
async fn test_foreign_file_cannot_be_read_or_deleted() {
    let app = TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");

    let secret = app
        .facade
        .upload_file(&alice, stream_of(b"secret"), "diary.txt", None)
        .await
        .unwrap();

    let err = app.facade.get_file_path(&bob, &secret.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);
    assert!(!err.message.contains("alice"));

    let err = app.facade.open_file(&bob, &secret.id).await.err().unwrap();
    assert_eq!(err.kind, ErrorKind::FileNotFound);

    let err = app.facade.stage_file(&bob, &secret.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);

    let err = app
        .facade
        .set_favorite(&bob, &secret.id, true)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);

    assert_eq!(
        app.facade.delete_file(&bob, &secret.id).await.unwrap(),
        DeleteOutcome::NotFound
    );
    assert!(app.path(&["alice", "diary.txt"]).is_file());
    assert_eq!(
        app.facade.get_file_path(&alice, &secret.id).await.unwrap(),
        app.path(&["alice", "diary.txt"])
    );
}

#[tokio::test]
async fn test_listings_never_include_other_users() {
    let app = TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");

    app.facade.create_folder(&alice, "a-only", None).await.unwrap();
    app.facade
        .upload_file(&alice, stream_of(b"a"), "a.txt", None)
        .await
        .unwrap();

    assert!(app.facade.list_child_folders(&bob, None).await.unwrap().is_empty());
    assert!(app.facade.list_files(&bob, None).await.unwrap().is_empty());
    assert!(app.facade.folder_tree(&bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_path_like_subject_is_rejected() {
    let app = TestApp::new().await;
    let sneaky = app.token("../alice");

    let err = app
        .facade
        .create_folder(&sneaky, "docs", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(TestApp::entries(&app.root), 0);
}
