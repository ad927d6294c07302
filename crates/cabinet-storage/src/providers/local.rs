//! Local filesystem storage provider.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::traits::storage::{ByteStream, StorageProvider};

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Absolute root directory for all stored files.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path,
    /// creating the directory if needed.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = std::path::absolute(root_path.as_ref()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid storage root: {}", root_path.as_ref().display()),
                e,
            )
        })?;
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Reject any path that is not strictly inside the root.
    fn contained<'p>(&self, path: &'p Path) -> AppResult<&'p Path> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::CurDir));
        if escapes || path == self.root || !path.starts_with(&self.root) {
            return Err(AppError::validation(format!(
                "Path {} is outside the storage root",
                path.display()
            )));
        }
        Ok(path)
    }

    async fn copy_stream(
        file: &mut fs::File,
        stream: &mut ByteStream,
        max_bytes: u64,
    ) -> AppResult<u64> {
        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            total_bytes += chunk.len() as u64;
            if total_bytes > max_bytes {
                return Err(AppError::validation(format!(
                    "Upload exceeds maximum size of {max_bytes} bytes"
                )));
            }
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to sync file", e))?;
        Ok(total_bytes)
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn ensure_dir(&self, path: &Path) -> AppResult<()> {
        let path = self.contained(path)?;
        fs::create_dir_all(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", path.display()),
                e,
            )
        })
    }

    async fn create_dir(&self, path: &Path) -> AppResult<()> {
        let path = self.contained(path)?;
        fs::create_dir(path).await.map_err(|e| {
            if e.kind() == IoErrorKind::AlreadyExists {
                AppError::folder_already_exists(format!("{} already exists", path.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", path.display()),
                    e,
                )
            }
        })?;
        debug!(path = %path.display(), "Created directory");
        Ok(())
    }

    async fn write_new(&self, path: &Path, mut stream: ByteStream, max_bytes: u64) -> AppResult<u64> {
        let path = self.contained(path)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                if e.kind() == IoErrorKind::AlreadyExists {
                    AppError::file_already_exists(format!("{} already exists", path.display()))
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create file: {}", path.display()),
                        e,
                    )
                }
            })?;

        match Self::copy_stream(&mut file, &mut stream, max_bytes).await {
            Ok(total_bytes) => {
                debug!(path = %path.display(), bytes = total_bytes, "Wrote file from stream");
                Ok(total_bytes)
            }
            Err(err) => {
                drop(file);
                if let Err(e) = fs::remove_file(path).await {
                    warn!(path = %path.display(), error = %e, "Failed to remove partial file");
                }
                Err(err)
            }
        }
    }

    async fn read(&self, path: &Path) -> AppResult<ByteStream> {
        let path = self.contained(path)?;
        let file = fs::File::open(path).await.map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                AppError::new(
                    ErrorKind::FileNotFound,
                    format!("File not found: {}", path.display()),
                )
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open file: {}", path.display()),
                    e,
                )
            }
        })?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn read_bytes(&self, path: &Path) -> AppResult<Bytes> {
        let path = self.contained(path)?;
        let data = fs::read(path).await.map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                AppError::new(
                    ErrorKind::FileNotFound,
                    format!("File not found: {}", path.display()),
                )
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read file: {}", path.display()),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn remove_file(&self, path: &Path) -> AppResult<bool> {
        let path = self.contained(path)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {}", path.display()),
                e,
            )),
        }
    }

    async fn remove_dir_all(&self, path: &Path) -> AppResult<bool> {
        let path = self.contained(path)?;
        match fs::remove_dir_all(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete directory: {}", path.display()),
                e,
            )),
        }
    }

    async fn exists(&self, path: &Path) -> AppResult<bool> {
        let path = self.contained(path)?;
        fs::try_exists(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat: {}", path.display()),
                e,
            )
        })
    }
}
