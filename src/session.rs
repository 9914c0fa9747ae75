//! Vault session orchestration over the `bw` CLI.
//!
//! [`BwSession`] wraps the login/unlock/list/download/export/lock/logout
//! subcommands behind one object holding the ephemeral session token.
//! Credentials are passed to each `bw` invocation as a child-process
//! environment map scoped to that single call; the parent environment
//! is never mutated.

use crate::cli::{check_command_exists, run_checked, run_command, CliOutput};
use crate::credentials::Credentials;
use crate::item::{BwResponse, ItemList, UnlockData, VaultItem};
use crate::{Attachment, BackupError, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Environment variable the CLI reads the API client id from.
pub const BW_ENV_CLIENT_ID: &str = "BW_CLIENTID";
/// Environment variable the CLI reads the API client secret from.
pub const BW_ENV_CLIENT_SECRET: &str = "BW_CLIENTSECRET";
/// Environment variable the CLI reads the master password from.
pub const BW_ENV_PASSWORD: &str = "BW_PASSWORD";

const BW_PROGRAM: &str = "bw";

/// An authenticated session with the Bitwarden CLI.
///
/// Created by [`BwSession::open`], which logs in with the API key and
/// unlocks the vault. The stored token is required by every subsequent
/// authenticated call and cleared by [`BwSession::end_session`].
pub struct BwSession {
    program: String,
    credentials: Credentials,
    token: Option<String>,
}

impl BwSession {
    /// Creates an unauthenticated session using the `bw` binary from PATH.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_program(credentials, BW_PROGRAM)
    }

    /// Creates an unauthenticated session using a specific binary.
    ///
    /// Tests point this at a stub executable.
    pub fn with_program(credentials: Credentials, program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            credentials,
            token: None,
        }
    }

    /// Opens a session: verifies the CLI is installed, logs in with the
    /// API key, and unlocks the vault.
    pub async fn open(credentials: Credentials) -> Result<Self> {
        Self::open_with_program(credentials, BW_PROGRAM).await
    }

    /// Like [`BwSession::open`] with an explicit binary.
    pub async fn open_with_program(
        credentials: Credentials,
        program: impl Into<String>,
    ) -> Result<Self> {
        let mut session = Self::with_program(credentials, program);

        if !check_command_exists(&session.program).await? {
            return Err(BackupError::CliNotInstalled(format!(
                "{} command not found - install the Bitwarden CLI from https://bitwarden.com/download/",
                session.program
            )));
        }

        session.login().await?;
        session.unlock().await?;
        Ok(session)
    }

    /// Returns the current session token, if unlocked.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(BackupError::NotAuthenticated)
    }

    /// Logs in with the API key.
    ///
    /// An "already logged in" response is treated as success, so a
    /// repeated login with the same credentials never fails.
    pub async fn login(&self) -> Result<()> {
        let output = run_command(
            &self.program,
            &["login", "--apikey", "--nointeraction", "--response"],
            &[
                (BW_ENV_CLIENT_ID, self.credentials.client_id.as_str()),
                (BW_ENV_CLIENT_SECRET, self.credentials.client_secret.as_str()),
                (BW_ENV_PASSWORD, self.credentials.master_password.as_str()),
            ],
        )
        .await?;

        if output.success() {
            debug!("api-key login succeeded");
            return Ok(());
        }

        let message = failure_message(&output);
        if message.starts_with("You are already logged in as") {
            debug!("already logged in, continuing");
            return Ok(());
        }

        Err(BackupError::login(message))
    }

    /// Unlocks the vault and stores the session token.
    pub async fn unlock(&mut self) -> Result<()> {
        let output = run_command(
            &self.program,
            &[
                "unlock",
                "--passwordenv",
                BW_ENV_PASSWORD,
                "--nointeraction",
                "--response",
            ],
            &[(BW_ENV_PASSWORD, self.credentials.master_password.as_str())],
        )
        .await?;

        if !output.success() {
            return Err(BackupError::login(failure_message(&output)));
        }

        let response: BwResponse = serde_json::from_slice(&output.stdout)?;
        let data = response
            .data
            .ok_or_else(|| BackupError::login("unlock response carried no data"))?;
        let unlock: UnlockData = serde_json::from_value(data)?;

        debug!("vault unlocked");
        self.token = Some(unlock.raw);
        Ok(())
    }

    /// Lists all vault items.
    pub async fn list_items(&self) -> Result<Vec<VaultItem>> {
        let token = self.require_token()?;

        let output = run_command(
            &self.program,
            &[
                "list",
                "items",
                "--nointeraction",
                "--response",
                "--session",
                token,
            ],
            &[],
        )
        .await?;

        if !output.success() {
            return Err(BackupError::list(failure_message(&output)));
        }

        let response: BwResponse = serde_json::from_slice(&output.stdout)?;
        let data = response
            .data
            .ok_or_else(|| BackupError::list("item list response carried no data"))?;
        let list: ItemList = serde_json::from_value(data)?;

        debug!(count = list.data.len(), "listed vault items");
        Ok(list.data)
    }

    /// Downloads one attachment into `target_dir`, creating it if absent.
    pub async fn get_attachment(
        &self,
        item_id: &str,
        attachment: &Attachment,
        target_dir: &Path,
    ) -> Result<()> {
        let token = self.require_token()?;

        fs::create_dir_all(target_dir).await?;

        // bw treats --output without a trailing separator as a file name.
        let mut output_dir = target_dir.display().to_string();
        if !output_dir.ends_with(std::path::MAIN_SEPARATOR) {
            output_dir.push(std::path::MAIN_SEPARATOR);
        }

        let output = run_command(
            &self.program,
            &[
                "get",
                "attachment",
                attachment.id.as_str(),
                "--itemid",
                item_id,
                "--output",
                output_dir.as_str(),
                "--session",
                token,
                "--response",
            ],
            &[],
        )
        .await?;

        if !output.success() {
            return Err(BackupError::transfer(format!(
                "could not download an attachment: {}",
                failure_message(&output)
            )));
        }

        debug!(attachment = %attachment.id, "attachment downloaded");
        Ok(())
    }

    /// Exports the vault to `<folder>/<filename>` in the given format,
    /// creating the folder if absent.
    pub async fn export_vault(&self, filename: &str, folder: &Path, format: &str) -> Result<()> {
        let token = self.require_token()?;

        fs::create_dir_all(folder).await?;
        let output_path = folder.join(filename);
        let output_arg = output_path.display().to_string();

        let output = run_command(
            &self.program,
            &[
                "export",
                "--output",
                output_arg.as_str(),
                "--format",
                format,
                "--session",
                token,
            ],
            &[],
        )
        .await?;

        if !output.success() {
            return Err(BackupError::transfer(format!(
                "could not export your vault: {}",
                failure_message(&output)
            )));
        }

        debug!(path = %output_path.display(), "vault exported");
        Ok(())
    }

    /// Locks the vault, logs out, and clears the stored token.
    pub async fn end_session(&mut self) -> Result<()> {
        run_checked(&self.program, &["lock"], &[]).await?;
        run_checked(&self.program, &["logout"], &[]).await?;
        self.token = None;

        debug!("session ended");
        Ok(())
    }
}

/// Extracts the failure reason from a finished `bw` invocation.
///
/// Prefers `message` from the JSON response envelope; falls back to
/// the raw output text when the payload is not parseable JSON.
fn failure_message(output: &CliOutput) -> String {
    if let Ok(response) = serde_json::from_slice::<BwResponse>(&output.stdout) {
        if let Some(message) = response.message {
            return message;
        }
    }

    let stdout = output.stdout_text();
    if stdout.trim().is_empty() {
        output.stderr_text()
    } else {
        stdout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: i32, stdout: &str, stderr: &str) -> CliOutput {
        CliOutput {
            code: Some(code),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            client_id: "user.id".to_string(),
            client_secret: "secret".to_string(),
            master_password: "pw".to_string(),
        }
    }

    #[test]
    fn test_failure_message_from_envelope() {
        let out = output(1, r#"{"success":false,"message":"Invalid master password."}"#, "");
        assert_eq!(failure_message(&out), "Invalid master password.");
    }

    #[test]
    fn test_failure_message_raw_fallback() {
        let out = output(1, "not json at all", "");
        assert_eq!(failure_message(&out), "not json at all");
    }

    #[test]
    fn test_failure_message_stderr_fallback() {
        let out = output(1, "  ", "broken pipe");
        assert_eq!(failure_message(&out), "broken pipe");
    }

    #[tokio::test]
    async fn test_list_items_without_token() {
        let session = BwSession::new(credentials());
        let result = session.list_items().await;
        assert!(matches!(result, Err(BackupError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_get_attachment_without_token() {
        let session = BwSession::new(credentials());
        let attachment = Attachment {
            id: "att-1".to_string(),
            file_name: None,
            size: None,
        };
        let result = session
            .get_attachment("item-1", &attachment, Path::new("/tmp/nowhere"))
            .await;
        assert!(matches!(result, Err(BackupError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_export_without_token() {
        let session = BwSession::new(credentials());
        let result = session
            .export_vault("export.json", Path::new("/tmp/nowhere"), "json")
            .await;
        assert!(matches!(result, Err(BackupError::NotAuthenticated)));
    }
}
