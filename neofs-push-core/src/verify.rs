//! Post-publish checks: objects are retrievable over HTTP and the container holds the
//! expected number of objects.

use tracing::{error, info, warn};

use crate::contract::{ObjectFetcher, StorageClient};
use crate::enumerate::FileEntry;
use crate::error::PublishError;

/// A file that could not be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    /// Remote content differs from the local file.
    Mismatch { url: String, local: usize, remote: usize },
    /// The object could not be fetched.
    Unreachable { url: String, message: String },
}

#[derive(Debug, Default)]
pub struct VerifyReport {
    pub checked: usize,
    pub failures: Vec<VerifyFailure>,
}

impl VerifyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// `base` and `path` joined with exactly one `/`.
pub fn object_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Fetch every file at `base_url/<publish path>` and compare it with the local copy.
/// All files are checked; failures are collected in the report.
pub async fn verify_downloads<F>(
    fetcher: &F,
    base_url: &str,
    files: &[FileEntry],
) -> Result<VerifyReport, PublishError>
where
    F: ObjectFetcher + ?Sized,
{
    let mut report = VerifyReport::default();
    for file in files {
        let url = object_url(base_url, &file.publish_path);
        let local = std::fs::read(&file.source).map_err(|e| PublishError::io(&file.source, e))?;
        report.checked += 1;
        match fetcher.fetch(&url).await {
            Ok(remote) if remote == local => info!(url = %url, "Object matches local file"),
            Ok(remote) => {
                warn!(url = %url, local = local.len(), remote = remote.len(), "Object differs from local file");
                report.failures.push(VerifyFailure::Mismatch {
                    url,
                    local: local.len(),
                    remote: remote.len(),
                });
            }
            Err(e) => {
                error!(url = %url, error = %e, "Failed to fetch object");
                report.failures.push(VerifyFailure::Unreachable {
                    url,
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}

pub async fn count_objects<C>(client: &C) -> Result<usize, PublishError>
where
    C: StorageClient + ?Sized,
{
    let count = client.list_objects().await?.len();
    info!(count, "Counted objects in container");
    Ok(count)
}

pub async fn check_object_count<C>(client: &C, expected: usize) -> Result<usize, PublishError>
where
    C: StorageClient + ?Sized,
{
    let actual = count_objects(client).await?;
    if actual != expected {
        return Err(PublishError::CountMismatch { expected, actual });
    }
    Ok(actual)
}
