//! Command line interface for neofs-push: argument parsing, merging flags with the optional
//! YAML config, and dispatch into `neofs-push-core`.
//!
//! All business logic lives in `neofs-push-core`; this module only turns user input into a
//! [`PublishConfig`] plus a [`NeofsCli`] client and reports the outcome.
//!
//! For programmatic or integration use, call [`run`] with a constructed [`Cli`].

use crate::fetch::HttpFetcher;
use crate::load_config::{load_config, read_password, FileConfig, NetworkSection, PublishSection};
use crate::neofs_cli::{rpc_endpoint, NeofsCli, NetworkConfig, DEFAULT_PROGRAM};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use neofs_push_core::config::{PublishConfig, DEFAULT_PUT_TIMEOUT_SECS};
use neofs_push_core::enumerate::enumerate;
use neofs_push_core::publish::publish;
use neofs_push_core::reconcile::ReplaceMode;
use neofs_push_core::verify::{check_object_count, count_objects, verify_downloads, VerifyFailure};
use std::path::PathBuf;

/// CLI for neofs-push: publish a directory of files to a NeoFS container.
#[derive(Parser, Debug)]
#[clap(
    name = "neofs-push",
    version,
    about = "Upload a directory to a NeoFS container with path attributes, expiration and stale object replacement"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload every file of a directory, replacing objects published at the same paths
    Push(PushArgs),
    /// Print the number of objects in the container
    Count(CountArgs),
    /// Check that published files are retrievable over HTTP and match the local copies
    Verify(VerifyArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArgs {
    /// NeoFS network domain, e.g. st1.storage.fs.neo.org
    #[clap(long = "neofs-domain", alias = "neofs_domain")]
    pub neofs_domain: Option<String>,
    /// Path to the wallet
    #[clap(long)]
    pub wallet: Option<String>,
    /// Container ID
    #[clap(long)]
    pub cid: Option<String>,
    /// neofs-cli binary to invoke
    #[clap(long = "neofs-cli")]
    pub neofs_cli: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PushArgs {
    #[clap(flatten)]
    pub network: NetworkArgs,
    /// Optional YAML config file; flags override its values
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Path to the directory with the files to be pushed
    #[clap(long = "files-dir", alias = "files_dir")]
    pub files_dir: Option<PathBuf>,
    /// User attributes in form of Key1=Value1,Key2=Value2
    #[clap(long)]
    pub attributes: Option<String>,
    /// Prefix prepended to the FilePath attribute of every object
    #[clap(long = "url-path-prefix", alias = "url_path_prefix")]
    pub url_path_prefix: Option<String>,
    /// Lifetime in epochs; absent or 0 stores objects indefinitely
    #[clap(long, allow_negative_numbers = true)]
    pub lifetime: Option<i64>,
    /// Timeout for each file upload, in seconds [default: 600]
    #[clap(long = "put-timeout", alias = "put_timeout")]
    pub put_timeout: Option<u64>,
    /// Treat files-dir as the root of the container (drop its name from FilePath) [default: false]
    #[clap(long = "strip-prefix", alias = "strip_prefix", value_parser = parse_bool)]
    pub strip_prefix: Option<bool>,
    /// Replace existing objects with the same attributes [default: true]
    #[clap(long = "replace-objects", alias = "replace_objects", value_parser = parse_bool)]
    pub replace_objects: Option<bool>,
    /// Remove every old object in the container after the upload [default: false]
    #[clap(
        long = "replace-container-contents",
        alias = "replace_container_contents",
        value_parser = parse_bool
    )]
    pub replace_container_contents: Option<bool>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CountArgs {
    #[clap(flatten)]
    pub network: NetworkArgs,
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Fail unless the container holds exactly this many objects
    #[clap(long)]
    pub expect: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct VerifyArgs {
    /// Gateway URL objects are served from, e.g. https://rest.fs.neo.org/<cid>
    #[clap(long = "base-url", alias = "base_url")]
    pub base_url: String,
    #[clap(long)]
    pub config: Option<PathBuf>,
    #[clap(long = "files-dir", alias = "files_dir")]
    pub files_dir: Option<PathBuf>,
    #[clap(long = "url-path-prefix", alias = "url_path_prefix")]
    pub url_path_prefix: Option<String>,
    #[clap(long = "strip-prefix", alias = "strip_prefix", value_parser = parse_bool)]
    pub strip_prefix: Option<bool>,
}

/// Accepts true/t/yes/y/1 and false/f/no/n/0, case-insensitively.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        _ => Err(format!("Invalid boolean value: {value}")),
    }
}

fn load_optional(config: Option<&PathBuf>) -> Result<FileConfig> {
    match config {
        Some(path) => load_config(path),
        None => Ok(FileConfig::default()),
    }
}

impl NetworkArgs {
    /// Flags first, then the config file. Domain, wallet and container id are required.
    pub fn resolve(&self, file: &NetworkSection) -> Result<NetworkConfig> {
        let domain = self.neofs_domain.clone().or_else(|| file.domain.clone());
        let wallet = self.wallet.clone().or_else(|| file.wallet.clone());
        let cid = self.cid.clone().or_else(|| file.cid.clone());
        match (domain, wallet, cid) {
            (Some(domain), Some(wallet), Some(container_id)) => Ok(NetworkConfig {
                endpoint: rpc_endpoint(&domain),
                wallet,
                container_id,
            }),
            (None, _, _) => bail!("--neofs-domain is required (flag or network.domain in config)"),
            (_, None, _) => bail!("--wallet is required (flag or network.wallet in config)"),
            (_, _, None) => bail!("--cid is required (flag or network.cid in config)"),
        }
    }

    fn client(&self, file: &NetworkSection) -> Result<NeofsCli> {
        let network = self.resolve(file)?;
        let program = self.neofs_cli.as_deref().unwrap_or(DEFAULT_PROGRAM);
        Ok(NeofsCli::new(network, read_password()).program(program))
    }
}

impl PushArgs {
    pub fn publish_config(&self, file: &PublishSection) -> Result<PublishConfig> {
        let Some(directory) = self.files_dir.clone().or_else(|| file.files_dir.clone()) else {
            bail!("--files-dir is required (flag or publish.files_dir in config)");
        };
        let replace_objects = self.replace_objects.or(file.replace_objects).unwrap_or(true);
        let replace_container = self
            .replace_container_contents
            .or(file.replace_container_contents)
            .unwrap_or(false);
        if replace_objects && replace_container {
            tracing::info!("Both replace modes requested; replacing the whole container");
        }
        Ok(PublishConfig {
            directory,
            attributes: self.attributes.clone().or_else(|| file.attributes.clone()),
            url_prefix: self
                .url_path_prefix
                .clone()
                .or_else(|| file.url_path_prefix.clone()),
            lifetime: self.lifetime.or(file.lifetime),
            put_timeout_secs: self
                .put_timeout
                .or(file.put_timeout)
                .unwrap_or(DEFAULT_PUT_TIMEOUT_SECS),
            strip_prefix: self.strip_prefix.or(file.strip_prefix).unwrap_or(false),
            replace: ReplaceMode::from_flags(replace_objects, replace_container),
        })
    }
}

/// Async CLI entrypoint shared by `main` and integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Push(args) => {
            let file = load_optional(args.config.as_ref())?;
            let config = args.publish_config(&file.publish)?;
            config.trace_loaded();
            let client = args.network.client(&file.network)?;
            tracing::info!(command = "push", "Starting publish");
            match publish(&config, &client).await {
                Ok(report) => {
                    tracing::info!(command = "push", uploaded = report.uploaded.len(), "Publish complete");
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "push", error = %e, "Publish failed");
                    Err(e.into())
                }
            }
        }
        Commands::Count(args) => {
            let file = load_optional(args.config.as_ref())?;
            let client = args.network.client(&file.network)?;
            let count = match args.expect {
                Some(expected) => check_object_count(&client, expected).await?,
                None => count_objects(&client).await?,
            };
            println!("{count}");
            Ok(())
        }
        Commands::Verify(args) => {
            let file = load_optional(args.config.as_ref())?;
            let Some(directory) = args.files_dir.clone().or(file.publish.files_dir) else {
                bail!("--files-dir is required (flag or publish.files_dir in config)");
            };
            let url_prefix = args.url_path_prefix.clone().or(file.publish.url_path_prefix);
            let strip_prefix = args.strip_prefix.or(file.publish.strip_prefix).unwrap_or(false);
            let files = enumerate(&directory, url_prefix.as_deref(), strip_prefix)?;
            let report = verify_downloads(&HttpFetcher::new(), &args.base_url, &files).await?;
            if !report.is_success() {
                for failure in &report.failures {
                    match failure {
                        VerifyFailure::Mismatch { url, local, remote } => {
                            eprintln!("MISMATCH {url}: local {local} bytes, remote {remote} bytes")
                        }
                        VerifyFailure::Unreachable { url, message } => {
                            eprintln!("UNREACHABLE {url}: {message}")
                        }
                    }
                }
                bail!(
                    "{} of {} files failed verification",
                    report.failures.len(),
                    report.checked
                );
            }
            println!("{} files verified", report.checked);
            Ok(())
        }
    }
}
