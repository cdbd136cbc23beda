//! Error taxonomy for a publish run.
//!
//! Every variant aborts the run. The one outcome callers are allowed to swallow is a
//! delete that failed because the object is already gone, see
//! [`PublishError::is_already_removed`].

use thiserror::Error;

/// NeoFS status code reported when an object has already been deleted.
pub const STATUS_OBJECT_ALREADY_REMOVED: &str = "2052";

#[derive(Error, Debug)]
pub enum PublishError {
    /// The external command exited with a non-zero status.
    #[error("Command failed: {command}\nError code: {code}\nStdout: {stdout}\nStderr: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The external command did not finish within its timeout and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    TimedOut { command: String, seconds: u64 },

    /// The external command could not be started at all.
    #[error("Failed to launch {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Missing or empty source directory, malformed attribute token, bad flag value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A command succeeded but its output could not be interpreted.
    #[error("Unparseable output from {command}: {output:?}")]
    UnparseableOutput { command: String, output: String },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Container holds {actual} objects, expected {expected}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },
}

impl PublishError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PublishError::InvalidInput(message.into())
    }

    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        PublishError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// True when a failed delete means the object was already removed.
    ///
    /// neofs-cli only reports this in free text, so the match is on the status message
    /// or its numeric code in either output stream.
    pub fn is_already_removed(&self) -> bool {
        match self {
            PublishError::CommandFailed { stdout, stderr, .. } => [stdout, stderr].iter().any(|out| {
                let lower = out.to_lowercase();
                lower.contains("object already removed")
                    || lower.contains(&format!("code = {STATUS_OBJECT_ALREADY_REMOVED}"))
            }),
            _ => false,
        }
    }
}
