//! # neofs-cli integration
//!
//! Bridges the [`StorageClient`] contract from `neofs-push-core` to the external
//! `neofs-cli` binary. Every operation is one child process, built as an argv list and
//! run through a [`CommandRunner`], so the whole client can be driven by a mock runner
//! in tests.
//!
//! The wallet password is handed to the child as `NEOFS_CLI_PASSWORD` and never appears
//! in logs or in rendered commands.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use neofs_push_core::attributes::AttributeFormat;
use neofs_push_core::contract::{ObjectId, PutRequest, StorageClient};
use neofs_push_core::epoch::parse_epoch;
use neofs_push_core::executor::{
    execute, CommandOutput, CommandRunner, CommandSpec, ExecOutput, ProcessRunner,
};
use neofs_push_core::PublishError;
use regex::Regex;

pub const DEFAULT_PROGRAM: &str = "neofs-cli";
pub const PASSWORD_ENV: &str = "NEOFS_CLI_PASSWORD";
pub const RPC_PORT: u16 = 8080;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Where objects go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// `host:port` of the RPC endpoint.
    pub endpoint: String,
    /// Path to the wallet file.
    pub wallet: String,
    pub container_id: String,
}

/// `{domain}:8080`.
pub fn rpc_endpoint(domain: &str) -> String {
    format!("{domain}:{RPC_PORT}")
}

fn found_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Found \d+ objects\.$").expect("static regex"))
}

fn object_id_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:O?ID):\s*(\S+)$").expect("static regex"))
}

pub struct NeofsCli<R: CommandRunner = ProcessRunner> {
    runner: R,
    network: NetworkConfig,
    password: Option<String>,
    program: String,
    command_timeout: Duration,
}

impl NeofsCli<ProcessRunner> {
    pub fn new(network: NetworkConfig, password: Option<String>) -> Self {
        Self::with_runner(ProcessRunner, network, password)
    }
}

impl<R: CommandRunner> NeofsCli<R> {
    pub fn with_runner(runner: R, network: NetworkConfig, password: Option<String>) -> Self {
        tracing::info!(
            endpoint = %network.endpoint,
            wallet = %network.wallet,
            cid = %network.container_id,
            password_set = password.is_some(),
            "Initialised neofs-cli client"
        );
        Self {
            runner,
            network,
            password,
            program: DEFAULT_PROGRAM.to_owned(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Use a different `neofs-cli` binary.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Timeout for everything except uploads.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// `neofs-cli --rpc-endpoint E --wallet W <args>` with the password in the environment.
    fn wallet_command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = CommandSpec::new(&self.program)
            .args([
                "--rpc-endpoint",
                self.network.endpoint.as_str(),
                "--wallet",
                self.network.wallet.as_str(),
            ])
            .args(args);
        if let Some(password) = &self.password {
            spec = spec.env(PASSWORD_ENV, password.clone());
        }
        spec
    }

    async fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<CommandOutput, PublishError> {
        self.runner.run(spec, timeout).await
    }

    /// Object ids printed one per line, without the `Found N objects.` summary.
    async fn run_listing(&self, spec: &CommandSpec) -> Result<Vec<ObjectId>, PublishError> {
        let lines = match execute(&self.runner, spec, false, self.command_timeout).await? {
            ExecOutput::Lines(lines) => lines,
            ExecOutput::Json(value) => {
                return Err(PublishError::UnparseableOutput {
                    command: spec.to_string(),
                    output: value.to_string(),
                })
            }
        };
        Ok(lines
            .into_iter()
            .filter(|line| !found_line().is_match(line))
            .map(ObjectId)
            .collect())
    }
}

fn parse_put_output(output: &CommandOutput) -> Option<ObjectId> {
    output.lines().iter().find_map(|line| {
        object_id_line()
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| ObjectId::new(m.as_str()))
    })
}

#[async_trait]
impl<R: CommandRunner> StorageClient for NeofsCli<R> {
    async fn current_epoch(&self) -> Result<u64, PublishError> {
        let spec = CommandSpec::new(&self.program).args([
            "netmap",
            "epoch",
            "--rpc-endpoint",
            self.network.endpoint.as_str(),
        ]);
        let output = self.run(&spec, self.command_timeout).await?;
        parse_epoch(&output.stdout)
    }

    async fn put_object(&self, req: &PutRequest) -> Result<Option<ObjectId>, PublishError> {
        let mut args = vec![
            "object".to_owned(),
            "put".to_owned(),
            "--cid".to_owned(),
            self.network.container_id.clone(),
            "--timeout".to_owned(),
            format!("{}s", req.timeout.as_secs()),
            "--no-progress".to_owned(),
        ];
        if let Some(epoch) = req.expire_at {
            args.push("--expire-at".to_owned());
            args.push(epoch.to_string());
        }
        args.push("--file".to_owned());
        args.push(req.file.display().to_string());
        args.push("--attributes".to_owned());
        args.push(req.attributes.render(AttributeFormat::Assign));

        let spec = self.wallet_command(args);
        tracing::info!(command = %spec, "Uploading object");
        let output = self.run(&spec, req.timeout).await?;
        let oid = parse_put_output(&output);
        if oid.is_none() {
            tracing::warn!(file = %req.file.display(), "neofs-cli did not report an object id");
        }
        Ok(oid)
    }

    async fn search_objects(&self, filters: &str) -> Result<Vec<ObjectId>, PublishError> {
        let spec = self.wallet_command([
            "object",
            "search",
            "--cid",
            self.network.container_id.as_str(),
            "--filters",
            filters,
        ]);
        let oids = self.run_listing(&spec).await?;
        tracing::debug!(filters, count = oids.len(), "Searched container");
        Ok(oids)
    }

    async fn list_objects(&self) -> Result<Vec<ObjectId>, PublishError> {
        let spec = self.wallet_command([
            "container",
            "list-objects",
            "--cid",
            self.network.container_id.as_str(),
        ]);
        self.run_listing(&spec).await
    }

    async fn delete_object(&self, oid: &ObjectId) -> Result<(), PublishError> {
        let spec = self.wallet_command([
            "object",
            "delete",
            "--cid",
            self.network.container_id.as_str(),
            "--oid",
            oid.as_str(),
        ]);
        self.run(&spec, self.command_timeout).await?;
        Ok(())
    }
}
