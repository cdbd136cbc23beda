//! `load_config` module: loads an optional YAML config file and the wallet password from the
//! environment.
//!
//! Every field of the file is optional; command line flags override whatever the file sets.
//! Secrets are never read from the file: the wallet password only comes from
//! `NEOFS_WALLET_PASSWORD`, read once at startup and passed explicitly to the client.
//!
//! # Errors
//! All errors use `anyhow::Error` with the offending path, surfaced at the CLI boundary.
//!
//! Accepted YAML:
//!
//! ```yaml
//! network:
//!   domain: st1.storage.fs.neo.org
//!   wallet: ./wallet.json
//!   cid: HXSaMJXk2g8C14ht8HSi7BBaiYZ1HeWh2xnWPGQCg4H6
//! publish:
//!   files_dir: ./public
//!   attributes: Type=site,Master=true
//!   url_path_prefix: 96-1697035975
//!   lifetime: 10
//!   put_timeout: 600
//!   strip_prefix: true
//!   replace_objects: true
//!   replace_container_contents: false
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const PASSWORD_ENV_NAME: &str = "NEOFS_WALLET_PASSWORD";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub publish: PublishSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NetworkSection {
    pub domain: Option<String>,
    pub wallet: Option<String>,
    pub cid: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PublishSection {
    pub files_dir: Option<PathBuf>,
    pub attributes: Option<String>,
    pub url_path_prefix: Option<String>,
    pub lifetime: Option<i64>,
    pub put_timeout: Option<u64>,
    pub strip_prefix: Option<bool>,
    pub replace_objects: Option<bool>,
    pub replace_container_contents: Option<bool>,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<Option<FileConfig>>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Wallet password from the environment, if set.
pub fn read_password() -> Option<String> {
    match std::env::var(PASSWORD_ENV_NAME) {
        Ok(password) => {
            info!("{PASSWORD_ENV_NAME} found in env");
            Some(password)
        }
        Err(_) => {
            warn!("{PASSWORD_ENV_NAME} not set; neofs-cli will run without a wallet password");
            None
        }
    }
}
