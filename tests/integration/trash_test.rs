//! Integration tests for deferred-deletion staging.

mod helpers;

use cabinet_core::ErrorKind;
use cabinet_core::config::StorageConfig;
use cabinet_entity::DeleteOutcome;
use helpers::{TestApp, stream_of};

#[tokio::test]
async fn test_staged_file_blocks_direct_delete() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"keep"), "keep.txt", None)
        .await
        .unwrap();
    let staged = app.facade.stage_file(&token, &file.id).await.unwrap();
    assert_eq!(staged.file_id, file.id);
    assert!(staged.expires_at > staged.deleted_at);

    let err = app.facade.delete_file(&token, &file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(app.path(&["u1", "keep.txt"]).is_file());

    let listed = app.facade.list_files(&token, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].is_deleted);
}

#[tokio::test]
async fn test_staged_file_blocks_folder_delete() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let outer = app.facade.create_folder(&token, "outer", None).await.unwrap();
    let inner = app.facade.create_folder(&token, "inner", Some(outer.id)).await.unwrap();
    let file = app
        .facade
        .upload_file(&token, stream_of(b"x"), "x.txt", Some(inner.id))
        .await
        .unwrap();
    app.facade.stage_file(&token, &file.id).await.unwrap();

    let err = app.facade.delete_folder(&token, outer.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(app.path(&["u1", "outer", "inner", "x.txt"]).is_file());
    assert_eq!(app.facade.folder_tree(&token).await.unwrap()[0].count(), 2);
}

#[tokio::test]
async fn test_restore_allows_delete_again() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"undo"), "undo.txt", None)
        .await
        .unwrap();
    app.facade.stage_file(&token, &file.id).await.unwrap();

    let restored = app.facade.restore_file(&token, &file.id).await.unwrap();
    assert!(!restored.is_deleted);

    assert_eq!(
        app.facade.delete_file(&token, &file.id).await.unwrap(),
        DeleteOutcome::Deleted
    );
}

#[tokio::test]
async fn test_double_stage_and_unstaged_restore_conflict() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"twice"), "twice.txt", None)
        .await
        .unwrap();

    let err = app.facade.restore_file(&token, &file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    app.facade.stage_file(&token, &file.id).await.unwrap();
    let err = app.facade.stage_file(&token, &file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_expired_staging_no_longer_protects() {
    let app = TestApp::with_storage_config(StorageConfig {
        trash_retention_hours: 0,
        ..StorageConfig::default()
    })
    .await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"old"), "expired.txt", None)
        .await
        .unwrap();
    app.facade.stage_file(&token, &file.id).await.unwrap();

    assert_eq!(
        app.facade.delete_file(&token, &file.id).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(!app.path(&["u1", "expired.txt"]).exists());
}
