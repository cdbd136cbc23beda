//! # contract: interfaces to the storage network
//!
//! This module defines the traits the publish flow drives and the plain data types passed
//! across them:
//! - [`StorageClient`]: epoch query, object put/search/list/delete in one container.
//! - [`ObjectFetcher`]: HTTP retrieval of published objects, used by verification.
//!
//! ## Mocking & Testing
//! Both traits are annotated for `mockall` (behind the `test-export-mocks` feature, on by
//! default) so dependent crates can script them in their integration tests.
//!
//! ## Implementations
//! The CLI crate implements [`StorageClient`] on top of `neofs-cli` and [`ObjectFetcher`]
//! on top of an HTTP client.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;

use crate::attributes::AttributeSet;
use crate::error::PublishError;

/// Opaque identifier of an object in a container. Only ever used as a delete target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        ObjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        ObjectId(s.to_owned())
    }
}

/// Everything needed to store one file as an object.
#[derive(Debug, Clone, PartialEq)]
pub struct PutRequest {
    /// Local file to upload.
    pub file: PathBuf,
    /// Attributes written on the object, path first.
    pub attributes: AttributeSet,
    /// Absolute epoch after which the object expires. `None` keeps it forever.
    pub expire_at: Option<u64>,
    /// Upper bound for the whole upload.
    pub timeout: Duration,
}

/// Operations on a single container of the storage network.
///
/// Implementations are bound to one endpoint, wallet and container at construction.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Current network epoch.
    async fn current_epoch(&self) -> Result<u64, PublishError>;

    /// Store a file. Returns the new object id when the network reports one.
    async fn put_object(&self, req: &PutRequest) -> Result<Option<ObjectId>, PublishError>;

    /// Ids of objects matching a `Key EQ Value,...` filter.
    async fn search_objects(&self, filters: &str) -> Result<Vec<ObjectId>, PublishError>;

    /// Ids of every object in the container.
    async fn list_objects(&self) -> Result<Vec<ObjectId>, PublishError>;

    async fn delete_object(&self, oid: &ObjectId) -> Result<(), PublishError>;
}

/// Retrieves a published object by URL.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PublishError>;
}
