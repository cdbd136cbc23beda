use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::reconcile::ReplaceMode;

pub const DEFAULT_PUT_TIMEOUT_SECS: u64 = 600;

/// Parameters of one publish run. Network location and credentials live in the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Directory whose files are published.
    pub directory: PathBuf,
    /// Extra attributes, `Key1=Value1,Key2=Value2`.
    #[serde(default)]
    pub attributes: Option<String>,
    /// Prepended to every `FilePath`.
    #[serde(default)]
    pub url_prefix: Option<String>,
    /// Lifetime in epochs; absent or non-positive keeps objects forever.
    #[serde(default)]
    pub lifetime: Option<i64>,
    #[serde(default = "default_put_timeout_secs")]
    pub put_timeout_secs: u64,
    /// Publish paths relative to `directory` instead of its parent.
    #[serde(default)]
    pub strip_prefix: bool,
    #[serde(default)]
    pub replace: ReplaceMode,
}

fn default_put_timeout_secs() -> u64 {
    DEFAULT_PUT_TIMEOUT_SECS
}

impl PublishConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            attributes: None,
            url_prefix: None,
            lifetime: None,
            put_timeout_secs: DEFAULT_PUT_TIMEOUT_SECS,
            strip_prefix: false,
            replace: ReplaceMode::default(),
        }
    }

    pub fn put_timeout(&self) -> Duration {
        Duration::from_secs(self.put_timeout_secs)
    }

    pub fn trace_loaded(&self) {
        info!(
            directory = %self.directory.display(),
            url_prefix = self.url_prefix.as_deref().unwrap_or(""),
            lifetime = ?self.lifetime,
            put_timeout_secs = self.put_timeout_secs,
            strip_prefix = self.strip_prefix,
            replace = ?self.replace,
            "Loaded PublishConfig"
        );
        debug!(?self, "PublishConfig loaded (full debug)");
    }
}
