//! Finding and deleting objects superseded by a run.
//!
//! The stale set is always computed before the first upload and deleted only after the
//! last upload succeeded, so a logical path never goes without a valid object.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::attributes::AttributeSet;
use crate::contract::{ObjectId, StorageClient};
use crate::enumerate::FileEntry;
use crate::error::PublishError;

/// Which pre-existing objects a run replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMode {
    /// Keep everything already in the container.
    Disabled,
    /// Replace objects whose attributes match a file being uploaded.
    #[default]
    SamePath,
    /// Replace every object that was in the container before the run.
    WholeContainer,
}

impl ReplaceMode {
    /// Map the two CLI switches; replacing the whole container wins.
    pub fn from_flags(replace_objects: bool, replace_container_contents: bool) -> Self {
        if replace_container_contents {
            ReplaceMode::WholeContainer
        } else if replace_objects {
            ReplaceMode::SamePath
        } else {
            ReplaceMode::Disabled
        }
    }
}

/// Outcome of [`delete_stale`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: Vec<ObjectId>,
    /// Deletes the network rejected because the object was already gone.
    pub already_removed: Vec<ObjectId>,
}

/// Objects the run will supersede, in discovery order without duplicates.
pub async fn find_stale<C>(
    client: &C,
    mode: ReplaceMode,
    files: &[FileEntry],
    extra: Option<&str>,
) -> Result<Vec<ObjectId>, PublishError>
where
    C: StorageClient + ?Sized,
{
    let found = match mode {
        ReplaceMode::Disabled => return Ok(Vec::new()),
        ReplaceMode::WholeContainer => client.list_objects().await?,
        ReplaceMode::SamePath => {
            let mut found = Vec::new();
            for file in files {
                let filter = AttributeSet::search_filter(&file.publish_path, extra)?;
                let matches = client.search_objects(&filter).await?;
                if !matches.is_empty() {
                    info!(path = %file.publish_path, count = matches.len(), "Found objects to replace");
                }
                found.extend(matches);
            }
            found
        }
    };

    let mut seen = HashSet::new();
    let stale: Vec<ObjectId> = found.into_iter().filter(|oid| seen.insert(oid.clone())).collect();
    info!(?mode, count = stale.len(), "Computed stale object set");
    Ok(stale)
}

/// Delete each id in turn. Already-removed objects count as deleted; anything else aborts.
pub async fn delete_stale<C>(client: &C, oids: &[ObjectId]) -> Result<DeleteSummary, PublishError>
where
    C: StorageClient + ?Sized,
{
    let mut summary = DeleteSummary::default();
    for oid in oids {
        match client.delete_object(oid).await {
            Ok(()) => {
                info!(oid = %oid, "Deleted stale object");
                summary.deleted.push(oid.clone());
            }
            Err(e) if e.is_already_removed() => {
                warn!(oid = %oid, "Stale object was already removed");
                summary.already_removed.push(oid.clone());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}
