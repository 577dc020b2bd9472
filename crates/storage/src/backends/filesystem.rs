//! Local filesystem blob sink.

use crate::error::{StorageError, StorageResult};
use crate::traits::{AppendError, BlobSink, ByteStream};
use async_trait::async_trait;
use futures::StreamExt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::instrument;

/// One file per upload under a root directory.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the root if needed.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Map a blob path to a file under the root, rejecting traversal.
    ///
    /// Blob paths are server-generated upload ids, but a durable store may
    /// outlive the process that wrote it, so the key is validated anyway.
    fn file_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(format!(
                "path traversal not allowed: {key}"
            )));
        }
        for component in Path::new(key).components() {
            match component {
                std::path::Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::InvalidKey(format!(
                        "contains unsafe path component: {key}"
                    )));
                }
            }
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobSink for FilesystemBackend {
    #[instrument(skip(self, body), fields(backend = "filesystem"))]
    async fn append(
        &self,
        path: &str,
        offset: u64,
        mut body: ByteStream,
    ) -> Result<u64, AppendError> {
        let fail = |source: StorageError| AppendError { written: 0, source };

        let target = self.file_path(path).map_err(fail)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&target)
            .await
            .map_err(|e| fail(e.into()))?;

        let length = file.metadata().await.map_err(|e| fail(e.into()))?.len();
        if offset > length {
            return Err(fail(StorageError::InvalidOffset { offset, length }));
        }
        if offset < length {
            file.set_len(offset).await.map_err(|e| fail(e.into()))?;
        }
        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(|e| fail(e.into()))?;

        let mut written: u64 = 0;
        let mut failure: Option<StorageError> = None;
        while let Some(next) = body.next().await {
            match next {
                Ok(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    if let Err(e) = file.write_all(&chunk).await {
                        // A short write may have landed part of this chunk;
                        // drop the tail so the reported count stays exact.
                        let _ = file.set_len(offset + written).await;
                        failure = Some(e.into());
                        break;
                    }
                    written += chunk.len() as u64;
                }
                Err(e) => {
                    failure = Some(StorageError::Io(e));
                    break;
                }
            }
        }

        if let Err(e) = file.sync_data().await
            && failure.is_none()
        {
            failure = Some(e.into());
        }

        match failure {
            None => Ok(written),
            Some(source) => {
                tracing::warn!(path, offset, written, error = %source, "partial append");
                Err(AppendError { written, source })
            }
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn length(&self, path: &str) -> StorageResult<u64> {
        let target = self.file_path(path)?;
        match fs::metadata(&target).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn truncate(&self, path: &str, length: u64) -> StorageResult<()> {
        let target = self.file_path(path)?;
        let file = match fs::OpenOptions::new().write(true).open(&target).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && length == 0 => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let current = file.metadata().await?.len();
        if current > length {
            file.set_len(length).await?;
            file.sync_data().await?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
