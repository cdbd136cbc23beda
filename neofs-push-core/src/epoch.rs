//! Epoch lookup and expiration arithmetic.

use serde::Serialize;
use tracing::info;

use crate::contract::StorageClient;
use crate::error::PublishError;

/// Expiration applied to every object of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpirationPolicy {
    Never,
    AtEpoch(u64),
}

impl ExpirationPolicy {
    /// Value for `--expire-at`, if any.
    pub fn expire_at(&self) -> Option<u64> {
        match self {
            ExpirationPolicy::Never => None,
            ExpirationPolicy::AtEpoch(epoch) => Some(*epoch),
        }
    }
}

/// Parse the output of `netmap epoch`.
pub fn parse_epoch(output: &str) -> Result<u64, PublishError> {
    output
        .trim()
        .parse::<u64>()
        .map_err(|_| PublishError::UnparseableOutput {
            command: "netmap epoch".to_owned(),
            output: output.to_owned(),
        })
}

pub async fn current_epoch<C>(client: &C) -> Result<u64, PublishError>
where
    C: StorageClient + ?Sized,
{
    let epoch = client.current_epoch().await?;
    info!(epoch, "Fetched current network epoch");
    Ok(epoch)
}

/// `current + lifetime`, or [`ExpirationPolicy::Never`] when no positive lifetime is set.
pub fn resolve_expiration(current: u64, lifetime: Option<i64>) -> ExpirationPolicy {
    match lifetime {
        Some(l) if l > 0 => ExpirationPolicy::AtEpoch(current.saturating_add(l as u64)),
        _ => ExpirationPolicy::Never,
    }
}

/// Resolve the run's expiration, querying the network only for a positive lifetime.
pub async fn expiration_for<C>(client: &C, lifetime: Option<i64>) -> Result<ExpirationPolicy, PublishError>
where
    C: StorageClient + ?Sized,
{
    match lifetime {
        Some(l) if l > 0 => {
            let current = current_epoch(client).await?;
            let policy = resolve_expiration(current, lifetime);
            info!(current, lifetime = l, ?policy, "Resolved object expiration");
            Ok(policy)
        }
        _ => Ok(ExpirationPolicy::Never),
    }
}
