//! Storage provider trait for the physical side of the namespace.

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for the physical storage backend.
///
/// All paths are absolute and must lie under [`StorageProvider::root`];
/// implementations reject anything else. Creation methods are exclusive
/// (the existence check and the creation are one atomic step) while the
/// removal methods are idempotent and report whether anything was removed.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// The top-level storage directory.
    fn root(&self) -> &Path;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Create a directory and any missing parents. Succeeds if it already exists.
    async fn ensure_dir(&self, path: &Path) -> AppResult<()>;

    /// Create exactly one new directory. Fails with `FolderAlreadyExists`
    /// if anything already occupies `path`.
    async fn create_dir(&self, path: &Path) -> AppResult<()>;

    /// Stream bytes into a new file, returning the number of bytes written.
    ///
    /// Fails with `FileAlreadyExists` if `path` is occupied. The file is
    /// synced before returning; on any failure, including exceeding
    /// `max_bytes`, the partial file is removed.
    async fn write_new(&self, path: &Path, stream: ByteStream, max_bytes: u64) -> AppResult<u64>;

    /// Open a file as a byte stream.
    async fn read(&self, path: &Path) -> AppResult<ByteStream>;

    /// Read a file into memory.
    async fn read_bytes(&self, path: &Path) -> AppResult<Bytes>;

    /// Remove a regular file. Returns `false` if it was already absent.
    async fn remove_file(&self, path: &Path) -> AppResult<bool>;

    /// Remove a directory and everything under it. Returns `false` if it
    /// was already absent.
    async fn remove_dir_all(&self, path: &Path) -> AppResult<bool>;

    /// Check whether anything exists at `path`.
    async fn exists(&self, path: &Path) -> AppResult<bool>;
}
