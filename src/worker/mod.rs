//! Out-of-process prediction bridge.
//!
//! The entrypoint runs in its own interpreter process so its dependency set
//! never loads into this one. Arguments go in through argv; stdout, stderr
//! and the exit status come back fully buffered, and are reduced to a
//! single JSON payload plus an exit code.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde_json::json;
use thiserror::Error;

pub const DEFAULT_LABEL: &str = "Python script";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Prediction script not found: {}", .0.display())]
    EntrypointNotFound(PathBuf),
    #[error("Worker error: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct WorkerSpec {
    pub interpreter: OsString,
    pub entrypoint: PathBuf,
    /// Names the entrypoint in synthesized error messages.
    pub label: String,
}

impl WorkerSpec {
    pub fn new(interpreter: impl Into<OsString>, entrypoint: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            entrypoint: entrypoint.into(),
            label: DEFAULT_LABEL.to_string(),
        }
    }

    pub fn argv(&self, input: &Path) -> Vec<OsString> {
        vec![
            self.interpreter.clone(),
            self.entrypoint.clone().into_os_string(),
            input.as_os_str().to_os_string(),
        ]
    }
}

/// One completed child run, fully materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInvocation {
    pub argv: Vec<OsString>,
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub exit_code: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgePayload {
    /// Child stdout, passed through byte for byte.
    Forwarded(Vec<u8>),
    Synthesized(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeOutput {
    pub payload: BridgePayload,
    pub exit_code: i32,
}

impl BridgeOutput {
    pub fn error(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            payload: BridgePayload::Synthesized(json!({ "error": message.into() })),
            exit_code,
        }
    }

    pub fn render(&self) -> Vec<u8> {
        match &self.payload {
            BridgePayload::Forwarded(bytes) => bytes.clone(),
            BridgePayload::Synthesized(value) => format!("{value}\n").into_bytes(),
        }
    }
}

pub fn run_bridge(worker: &WorkerSpec, input: &Path) -> BridgeOutput {
    match invoke(worker, input) {
        Ok(invocation) => reduce(&invocation, &worker.label),
        Err(err) => {
            tracing::error!(error = %err, "worker not run");
            BridgeOutput::error(err.to_string(), 1)
        }
    }
}

/// Validates both paths, then runs exactly one child to completion.
pub fn invoke(worker: &WorkerSpec, input: &Path) -> Result<WorkerInvocation, BridgeError> {
    let input_exists = input.exists();
    let entrypoint_exists = worker.entrypoint.exists();
    tracing::info!(
        interpreter = ?worker.interpreter,
        entrypoint = %worker.entrypoint.display(),
        input = %input.display(),
        input_exists,
        entrypoint_exists,
        "worker paths resolved"
    );
    if !input_exists {
        return Err(BridgeError::InputNotFound(input.to_path_buf()));
    }
    if !entrypoint_exists {
        return Err(BridgeError::EntrypointNotFound(worker.entrypoint.clone()));
    }

    let argv = worker.argv(input);
    let output = Command::new(&argv[0]).args(&argv[1..]).output()?;

    let invocation = WorkerInvocation {
        argv,
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: exit_code_of(output.status),
    };
    tracing::debug!(
        argv = ?invocation.argv,
        returncode = invocation.exit_code,
        stdout_len = invocation.stdout.len(),
        stderr_len = invocation.stderr.len(),
        "worker finished"
    );
    if !invocation.stderr.is_empty() {
        tracing::warn!(stderr = %invocation.stderr, "worker wrote to stderr");
    }
    Ok(invocation)
}

/// Decision table, first match wins:
/// stdout, then stderr, then a non-zero exit, then the silent clean exit.
pub fn reduce(invocation: &WorkerInvocation, label: &str) -> BridgeOutput {
    let code = invocation.exit_code;
    if !invocation.stdout.is_empty() {
        return BridgeOutput {
            payload: BridgePayload::Forwarded(invocation.stdout.clone()),
            exit_code: code,
        };
    }
    if !invocation.stderr.is_empty() {
        return BridgeOutput::error(format!("{label} error: {}", invocation.stderr), code);
    }
    if code != 0 {
        return BridgeOutput::error(
            format!("{label} failed with exit code {code} and produced no output"),
            code,
        );
    }
    BridgeOutput::error(format!("{label} completed but produced no output"), 1)
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Deletes the wrapped file when dropped, on every exit path.
#[derive(Debug)]
pub struct OwnedArtifact {
    path: PathBuf,
}

impl OwnedArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OwnedArtifact {
    fn drop(&mut self) {
        let path = self.path();
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "input artifact removed"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to remove input artifact"
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/worker/tests.rs"]
mod tests;
