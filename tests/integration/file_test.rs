//! Integration tests for file upload, download and deletion.

mod helpers;

use cabinet_core::ErrorKind;
use cabinet_core::config::StorageConfig;
use cabinet_entity::DeleteOutcome;
use helpers::{TestApp, collect, stream_of};

#[tokio::test]
async fn test_upload_into_folder_lands_under_user_root() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let docs = app.facade.create_folder(&token, "docs", None).await.unwrap();
    let file = app
        .facade
        .upload_file(&token, stream_of(b"hello"), "a.txt", Some(docs.id))
        .await
        .unwrap();

    let expected = app.path(&["u1", "docs", "a.txt"]);
    assert_eq!(file.file_path, expected.display().to_string());
    assert_eq!(file.file_name, "a");
    assert_eq!(file.file_extension, "txt");
    assert_eq!(file.file_size, 5);
    assert_eq!(file.folder_id, Some(docs.id));
    assert!(!file.is_deleted);
    assert_eq!(std::fs::read(&expected).unwrap(), b"hello");

    let resolved = app.facade.get_file_path(&token, &file.id).await.unwrap();
    assert_eq!(resolved, expected);
}

#[tokio::test]
async fn test_download_returns_uploaded_bytes() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let payload: &'static [u8] = b"%PDF-1.7 quarterly numbers";
    let file = app
        .facade
        .upload_file(&token, stream_of(payload), "report.pdf", None)
        .await
        .unwrap();
    assert_eq!(file.display_name(), "report.pdf");
    assert!(file.folder_id.is_none());

    let (record, stream) = app.facade.open_file(&token, &file.id).await.unwrap();
    assert_eq!(record, file);
    assert_eq!(collect(stream).await, payload);
}

#[tokio::test]
async fn test_multi_dot_names_split_at_last_dot() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"tarball"), "backup.2024.tar.gz", None)
        .await
        .unwrap();

    assert_eq!(file.file_name, "backup.2024.tar");
    assert_eq!(file.file_extension, "gz");
    assert!(app.path(&["u1", "backup.2024.tar.gz"]).is_file());
}

#[tokio::test]
async fn test_names_without_extension_are_rejected() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    for bad in ["README", ".bashrc", "trailing.", "../escape.txt"] {
        let err = app
            .facade
            .upload_file(&token, stream_of(b"x"), bad, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{bad:?}");
    }
    assert!(app.facade.list_files(&token, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_upload_keeps_first_file() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let first = app
        .facade
        .upload_file(&token, stream_of(b"original"), "notes.md", None)
        .await
        .unwrap();
    let err = app
        .facade
        .upload_file(&token, stream_of(b"clobber"), "notes.md", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::FileAlreadyExists);
    assert_eq!(std::fs::read(app.path(&["u1", "notes.md"])).unwrap(), b"original");
    assert_eq!(app.facade.list_files(&token, None).await.unwrap(), vec![first]);
}

#[tokio::test]
async fn test_upload_over_limit_leaves_nothing_behind() {
    let app = TestApp::with_storage_config(StorageConfig {
        max_upload_size_bytes: 4,
        ..StorageConfig::default()
    })
    .await;
    let token = app.token("u1");

    let err = app
        .facade
        .upload_file(&token, stream_of(b"too many bytes"), "big.bin", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(!app.path(&["u1", "big.bin"]).exists());
    assert!(app.facade.list_files(&token, None).await.unwrap().is_empty());

    let ok = app
        .facade
        .upload_file(&token, stream_of(b"tiny"), "small.bin", None)
        .await
        .unwrap();
    assert_eq!(ok.file_size, 4);
}

#[tokio::test]
async fn test_upload_into_missing_folder_fails() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let err = app
        .facade
        .upload_file(&token, stream_of(b"x"), "a.txt", Some(77))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::FolderNotFound);
}

#[tokio::test]
async fn test_delete_file_twice_is_idempotent() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"bye"), "old.txt", None)
        .await
        .unwrap();

    assert_eq!(
        app.facade.delete_file(&token, &file.id).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(!app.path(&["u1", "old.txt"]).exists());
    assert_eq!(
        app.facade.delete_file(&token, &file.id).await.unwrap(),
        DeleteOutcome::NotFound
    );

    let err = app.facade.get_file_path(&token, &file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);
}

#[tokio::test]
async fn test_missing_physical_file_is_reported() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"gone"), "ghost.txt", None)
        .await
        .unwrap();
    std::fs::remove_file(app.path(&["u1", "ghost.txt"])).unwrap();

    let err = app.facade.open_file(&token, &file.id).await.err().unwrap();
    assert_eq!(err.kind, ErrorKind::FileNotFound);

    assert_eq!(
        app.facade.delete_file(&token, &file.id).await.unwrap(),
        DeleteOutcome::AlreadyGone
    );
    assert!(app.facade.list_files(&token, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_files_is_scoped_to_folder() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let docs = app.facade.create_folder(&token, "docs", None).await.unwrap();
    let at_root = app
        .facade
        .upload_file(&token, stream_of(b"r"), "root.txt", None)
        .await
        .unwrap();
    let in_docs = app
        .facade
        .upload_file(&token, stream_of(b"d"), "doc.txt", Some(docs.id))
        .await
        .unwrap();

    assert_eq!(app.facade.list_files(&token, None).await.unwrap(), vec![at_root]);
    assert_eq!(
        app.facade.list_files(&token, Some(docs.id)).await.unwrap(),
        vec![in_docs]
    );
}

#[tokio::test]
async fn test_set_favorite_toggles_flag() {
    let app = TestApp::new().await;
    let token = app.token("u1");

    let file = app
        .facade
        .upload_file(&token, stream_of(b"star"), "fav.txt", None)
        .await
        .unwrap();
    assert!(!file.is_favorite);

    let starred = app.facade.set_favorite(&token, &file.id, true).await.unwrap();
    assert!(starred.is_favorite);
    let unstarred = app.facade.set_favorite(&token, &file.id, false).await.unwrap();
    assert!(!unstarred.is_favorite);

    let err = app
        .facade
        .set_favorite(&token, "no-such-file", true)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);
}

#[tokio::test]
async fn test_invalid_token_cannot_upload() {
    let app = TestApp::new().await;

    let err = app
        .facade
        .upload_file("Bearer garbage", stream_of(b"x"), "a.txt", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert_eq!(TestApp::entries(&app.root), 0);
}
