//! Local filesystem object store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::traits::object_store::{ByteStream, ObjectStore};

/// Object store that keeps each key as a file under a root directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a key to an absolute path within the root.
    ///
    /// Keys may not climb out of the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = Path::new(path.trim_start_matches('/'));
        if clean.as_os_str().is_empty()
            || clean
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::validation(format!("Invalid storage key: {path}")));
        }
        Ok(self.root.join(clean))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

/// Map an I/O error for `path`, keeping not-found distinguishable.
fn io_error(e: std::io::Error, action: &str, path: &str) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Object not found: {path}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {path}"), e)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| io_error(e, "open object", path))?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| io_error(e, "read object", path))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data)
            .await
            .map_err(|e| io_error(e, "write object", path))?;

        debug!(path, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        fs::remove_file(&full_path)
            .await
            .map_err(|e| io_error(e, "delete object", path))?;
        debug!(path, "Deleted object");
        Ok(())
    }

    async fn remove_many(&self, paths: &[String]) -> AppResult<()> {
        let mut missing = Vec::new();
        let mut first_failure = None;

        for path in paths {
            match self.delete(path).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => missing.push(path.as_str()),
                Err(e) => {
                    warn!(path = %path, error = %e, "Failed to remove object");
                    first_failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_failure {
            return Err(e);
        }
        if !missing.is_empty() {
            return Err(AppError::not_found(format!(
                "Objects not found: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        Ok(fs::try_exists(&full_path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_store() -> (tempfile::TempDir, LocalObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let (_dir, store) = make_store().await;

        let data = Bytes::from("hello world");
        store.write("u1/root/file.txt", data.clone()).await.unwrap();
        assert!(store.exists("u1/root/file.txt").await.unwrap());

        let read_back = store.read_bytes("u1/root/file.txt").await.unwrap();
        assert_eq!(read_back, data);

        store.delete("u1/root/file.txt").await.unwrap();
        assert!(!store.exists("u1/root/file.txt").await.unwrap());

        let err = store.delete("u1/root/file.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_remove_many_removes_present_and_reports_missing() {
        let (_dir, store) = make_store().await;
        store.write("u1/A/a.txt", Bytes::from("a")).await.unwrap();
        store.write("u1/A/b.txt", Bytes::from("b")).await.unwrap();

        let paths = vec![
            "u1/A/a.txt".to_string(),
            "u1/A/gone.txt".to_string(),
            "u1/A/b.txt".to_string(),
        ];
        let err = store.remove_many(&paths).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.message.contains("u1/A/gone.txt"));

        assert!(!store.exists("u1/A/a.txt").await.unwrap());
        assert!(!store.exists("u1/A/b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_many_all_present() {
        let (_dir, store) = make_store().await;
        store.write("k1", Bytes::from("1")).await.unwrap();
        store.write("k2", Bytes::from("2")).await.unwrap();

        store
            .remove_many(&["k1".to_string(), "k2".to_string()])
            .await
            .unwrap();
        assert!(!store.exists("k1").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_keys_outside_root() {
        let (_dir, store) = make_store().await;
        let err = store
            .write("../escape.txt", Bytes::from("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_read_stream() {
        let (_dir, store) = make_store().await;
        store
            .write("stream.bin", Bytes::from(vec![7u8; 10_000]))
            .await
            .unwrap();

        let mut stream = store.read("stream.bin").await.unwrap();
        let mut total = 0;
        while let Some(chunk) = stream.next().await {
            total += chunk.unwrap().len();
        }
        assert_eq!(total, 10_000);
    }
}
