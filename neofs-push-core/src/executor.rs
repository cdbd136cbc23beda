//! Runs external commands and captures their output.
//!
//! Commands are built as an argv list ([`CommandSpec`]), never as a shell string, so
//! attribute values and paths reach the child process exactly as given. Credentials are
//! attached as environment variables on the child and are never rendered by `Display`
//! or `Debug`.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::PublishError;

/// A single external command invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_keys: Vec<&str> = self.envs.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("envs", &format_args!("{env_keys:?} (values redacted)"))
            .finish()
    }
}

/// Captured result of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Non-empty stdout lines, trimmed.
    pub fn lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Stdout as JSON. Output that is not JSON comes back as an array of its lines.
    pub fn json(&self) -> serde_json::Value {
        match serde_json::from_str(&self.stdout) {
            Ok(value) => value,
            Err(_) => serde_json::Value::Array(
                self.stdout
                    .lines()
                    .map(|l| serde_json::Value::String(l.to_owned()))
                    .collect(),
            ),
        }
    }
}

/// Output of [`execute`] in the requested shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutput {
    Lines(Vec<String>),
    Json(serde_json::Value),
}

/// Seam between the publish flow and the operating system.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `spec` to completion, failing on non-zero exit or after `timeout`.
    async fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<CommandOutput, PublishError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<CommandOutput, PublishError> {
        let command = spec.to_string();
        debug!(command = %command, timeout_secs = timeout.as_secs(), "Running external command");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            error!(command = %command, error = ?e, "Failed to launch external command");
            PublishError::Spawn {
                command: command.clone(),
                source: e,
            }
        })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!(command = %command, error = ?e, "Failed to collect command output");
                return Err(PublishError::io(&spec.program, e));
            }
            Err(_) => {
                error!(command = %command, timeout_secs = timeout.as_secs(), "Command timed out");
                return Err(PublishError::TimedOut {
                    command,
                    seconds: timeout.as_secs(),
                });
            }
        };

        let code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(command = %command, code, stdout = %stdout, "Command finished");

        if !output.status.success() {
            return Err(PublishError::CommandFailed {
                command,
                code,
                stdout,
                stderr,
            });
        }
        Ok(CommandOutput { code, stdout, stderr })
    }
}

/// Run `spec` and return its stdout as lines or, with `parse_json`, as JSON.
pub async fn execute<R>(
    runner: &R,
    spec: &CommandSpec,
    parse_json: bool,
    timeout: Duration,
) -> Result<ExecOutput, PublishError>
where
    R: CommandRunner + ?Sized,
{
    let output = runner.run(spec, timeout).await?;
    if parse_json {
        Ok(ExecOutput::Json(output.json()))
    } else {
        Ok(ExecOutput::Lines(output.lines()))
    }
}
