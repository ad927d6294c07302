//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tempfile::TempDir;

use cabinet_auth::{JwtEncoder, JwtIdentityResolver};
use cabinet_core::config::{AuthConfig, DatabaseConfig, StorageConfig};
use cabinet_core::traits::storage::{ByteStream, StorageProvider};
use cabinet_database::DatabasePool;
use cabinet_database::migration::run_migrations;
use cabinet_service::StorageFacade;
use cabinet_storage::LocalStorageProvider;

/// Test application context
pub struct TestApp {
    /// The facade under test
    pub facade: StorageFacade,
    /// Database pool for direct queries
    pub db: DatabasePool,
    /// Absolute storage root
    pub root: PathBuf,
    encoder: JwtEncoder,
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default limits
    pub async fn new() -> Self {
        Self::with_storage_config(StorageConfig::default()).await
    }

    /// Create a new test application with custom storage settings
    pub async fn with_storage_config(storage_config: StorageConfig) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = DatabasePool::connect_in_memory()
            .await
            .expect("Failed to open test database");
        Self::build_in(dir, storage_config, db).await
    }

    /// Create a test application backed by a file database with a
    /// multi-connection pool, so concurrent requests really overlap.
    pub async fn with_file_database() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", dir.path().join("cabinet.db").display()),
            max_connections: 8,
            connect_timeout_seconds: 30,
            busy_timeout_seconds: 30,
        };
        let db = DatabasePool::connect(&config)
            .await
            .expect("Failed to open test database");
        Self::build_in(dir, StorageConfig::default(), db).await
    }

    async fn build_in(dir: TempDir, mut storage_config: StorageConfig, db: DatabasePool) -> Self {
        storage_config.root_path = dir.path().join("storage").display().to_string();

        let auth = AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            ..AuthConfig::default()
        };

        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let storage = LocalStorageProvider::new(&storage_config.root_path)
            .await
            .expect("Failed to init storage");
        let root = storage.root().to_path_buf();

        let facade = StorageFacade::new(
            db.clone(),
            Arc::new(JwtIdentityResolver::new(&auth)),
            Arc::new(storage),
            &storage_config,
        );

        Self {
            facade,
            db,
            root,
            encoder: JwtEncoder::new(&auth),
            _dir: dir,
        }
    }

    /// Issue a valid token for `user_id`
    pub fn token(&self, user_id: &str) -> String {
        self.encoder.issue(user_id).expect("Failed to issue token")
    }

    /// `<root>/<segments...>`
    pub fn path(&self, segments: &[&str]) -> PathBuf {
        segments.iter().fold(self.root.clone(), |p, s| p.join(s))
    }

    /// Number of entries directly inside `dir`
    pub fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }
}

/// A byte stream over `data`, split into small chunks
pub fn stream_of(data: &'static [u8]) -> ByteStream {
    let chunks: Vec<std::io::Result<Bytes>> = data
        .chunks(3)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    Box::pin(futures::stream::iter(chunks))
}

/// Drain a byte stream into memory
pub async fn collect(mut stream: ByteStream) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.expect("stream error"));
    }
    out
}
