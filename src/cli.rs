//! Subprocess execution helpers for the `bw` CLI.
//!
//! Every vault operation is a blocking invocation of an external
//! command-line tool. This module captures exit status and both output
//! streams so callers can parse the tool's JSON response envelope even
//! on failure, and scopes credential environment variables to a single
//! child process.

use crate::{BackupError, Result};
use std::process::Stdio;
use tokio::process::Command;

/// Captured output of a finished child process.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code, if the process terminated normally.
    pub code: Option<i32>,
    /// Raw standard output bytes.
    pub stdout: Vec<u8>,
    /// Raw standard error bytes.
    pub stderr: Vec<u8>,
}

impl CliOutput {
    /// Whether the process exited successfully.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Standard output decoded lossily as UTF-8.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded lossily as UTF-8.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Executes a command and captures its output.
///
/// `env` entries are set only for this child process; nothing is
/// written into the parent environment. A non-zero exit is not an
/// error here - callers inspect [`CliOutput`] because the `bw` CLI
/// reports failures through its JSON envelope on stdout.
///
/// # Errors
///
/// Returns [`BackupError::CliNotInstalled`] if the program cannot be
/// found, or [`BackupError::Io`] for other spawn failures.
pub async fn run_command(program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CliOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    for (key, value) in env {
        cmd.env(key, value);
    }

    let output = cmd.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BackupError::CliNotInstalled(format!("{} command not found", program))
        } else {
            BackupError::Io(e)
        }
    })?;

    Ok(CliOutput {
        code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Executes a command and returns stdout, failing on non-zero exit.
///
/// Used for calls with no response envelope (`bw lock`, `bw logout`).
///
/// # Errors
///
/// Returns [`BackupError::CommandFailed`] when the exit code is
/// non-zero, with stderr included in the message.
pub async fn run_checked(program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<String> {
    let output = run_command(program, args, env).await?;

    if !output.success() {
        return Err(BackupError::CommandFailed(format!(
            "{} failed with exit code {}: {}",
            program,
            output.code.unwrap_or(-1),
            output.stderr_text()
        )));
    }

    Ok(output.stdout_text())
}

/// Checks if a command-line tool is available in PATH.
pub async fn check_command_exists(program: &str) -> Result<bool> {
    let status = Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(BackupError::Io)?;

    Ok(status.success())
}
