//! Object store trait for pluggable blob storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Key-addressed blob storage.
///
/// Keys are `/`-separated storage paths such as `"{user}/{folder}/{name}"`.
/// Implementations report a missing key as [`ErrorKind::NotFound`]; callers
/// decide whether that is benign.
///
/// [`ErrorKind::NotFound`]: crate::error::ErrorKind::NotFound
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the store is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read an object and return its byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Read an object into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to the given key, replacing any existing object.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete one object. A missing key yields `NotFound`.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Delete many objects in one call.
    ///
    /// Every present key is removed even when some are missing; if any key
    /// was missing and nothing else failed, the call returns `NotFound`
    /// naming the missing keys. Any other failure is returned as-is after
    /// attempting the remaining keys.
    async fn remove_many(&self, paths: &[String]) -> AppResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
