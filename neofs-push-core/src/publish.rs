//! High-level flow: publish a directory into a container, replacing what it supersedes.
//!
//! Steps of one run:
//!   - validate the source directory and the extra attributes
//!   - resolve the expiration epoch once
//!   - enumerate the files once
//!   - compute the stale object set (see [`crate::reconcile`])
//!   - upload every file, stopping at the first failure
//!   - delete the stale set
//!
//! A failed upload leaves the remaining files untouched and deletes nothing.

use serde::Serialize;
use tracing::{error, info};

use crate::attributes::{parse_extra, AttributeSet};
use crate::config::PublishConfig;
use crate::contract::{ObjectId, PutRequest, StorageClient};
use crate::enumerate::enumerate;
use crate::epoch::{expiration_for, ExpirationPolicy};
use crate::error::PublishError;
use crate::reconcile::{delete_stale, find_stale};

/// Summary of a completed run.
#[derive(Debug, Serialize)]
pub struct PublishReport {
    pub expiration: ExpirationPolicy,
    pub uploaded: Vec<UploadedObject>,
    pub deleted: Vec<ObjectId>,
    pub already_removed: Vec<ObjectId>,
}

#[derive(Debug, Serialize)]
pub struct UploadedObject {
    pub publish_path: String,
    pub mime_type: String,
    pub object_id: Option<ObjectId>,
}

pub async fn publish<C>(config: &PublishConfig, client: &C) -> Result<PublishReport, PublishError>
where
    C: StorageClient + ?Sized,
{
    info!(directory = %config.directory.display(), "[PUSH] Starting publish run");
    validate_directory(config)?;
    parse_extra(config.attributes.as_deref())?;

    let expiration = expiration_for(client, config.lifetime).await?;
    let files = enumerate(&config.directory, config.url_prefix.as_deref(), config.strip_prefix)?;
    if files.is_empty() {
        error!(directory = %config.directory.display(), "[PUSH][ERROR] No files to publish");
        return Err(PublishError::invalid_input(format!(
            "Directory '{}' contains no files.",
            config.directory.display()
        )));
    }
    let stale = find_stale(client, config.replace, &files, config.attributes.as_deref()).await?;

    let mut uploaded = Vec::with_capacity(files.len());
    for file in &files {
        let attributes = AttributeSet::compile(
            &file.publish_path,
            Some(&file.mime_type),
            config.attributes.as_deref(),
        )?;
        let req = PutRequest {
            file: file.source.clone(),
            attributes,
            expire_at: expiration.expire_at(),
            timeout: config.put_timeout(),
        };
        let object_id = match client.put_object(&req).await {
            Ok(oid) => {
                info!(path = %file.publish_path, oid = ?oid, "[PUSH] Uploaded file");
                oid
            }
            Err(e) => {
                error!(path = %file.publish_path, error = %e, "[PUSH][ERROR] Upload failed, aborting run");
                return Err(e);
            }
        };
        uploaded.push(UploadedObject {
            publish_path: file.publish_path.clone(),
            mime_type: file.mime_type.clone(),
            object_id,
        });
    }

    let summary = delete_stale(client, &stale).await?;
    info!(
        uploaded = uploaded.len(),
        deleted = summary.deleted.len(),
        already_removed = summary.already_removed.len(),
        "[PUSH] Publish run complete"
    );

    Ok(PublishReport {
        expiration,
        uploaded,
        deleted: summary.deleted,
        already_removed: summary.already_removed,
    })
}

fn validate_directory(config: &PublishConfig) -> Result<(), PublishError> {
    let dir = &config.directory;
    if !dir.exists() {
        error!(directory = %dir.display(), "[PUSH][ERROR] Directory does not exist");
        return Err(PublishError::invalid_input(format!(
            "Directory '{}' does not exist.",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(PublishError::invalid_input(format!(
            "'{}' is not a directory.",
            dir.display()
        )));
    }
    let mut listing = std::fs::read_dir(dir).map_err(|e| PublishError::io(dir, e))?;
    if listing.next().is_none() {
        error!(directory = %dir.display(), "[PUSH][ERROR] Directory is empty");
        return Err(PublishError::invalid_input(format!(
            "Directory '{}' is empty.",
            dir.display()
        )));
    }
    Ok(())
}
