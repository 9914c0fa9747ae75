//! bwbackup - one-shot encrypted backup of a Bitwarden vault.
//!
//! Drives the official `bw` CLI to log in with an API key, unlock the
//! vault, download every item attachment, export the vault as JSON,
//! and pack the result into a password-protected 7z archive (AES-256,
//! encrypted header, store mode). The plaintext staging folder is
//! deleted once the archive exists.
//!
//! # Quick Start
//!
//! ```no_run
//! use bwbackup::{archive, backup, BwSession, Credentials};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> bwbackup::Result<()> {
//!     let credentials = Credentials::acquire(Default::default())?;
//!     let password = credentials.master_password.clone();
//!
//!     let folder = Path::new("bitwarden-backup-2024-1-1_0-0-0");
//!     let mut session = BwSession::open(credentials).await?;
//!
//!     backup::download_attachments(folder, &session).await?;
//!     session.export_vault(backup::EXPORT_FILE, folder, "json").await?;
//!     session.end_session().await?;
//!
//!     archive::archive_and_encrypt(folder, &password).await?;
//!     archive::clean_up(folder).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Design
//!
//! - All `bw` invocations go through [`cli::run_command`]; credentials
//!   travel in per-call child environments, never in the parent
//!   process environment.
//! - Every failure mode has a distinct exit code; see
//!   [`BackupError::exit_code`].
//! - Fully sequential: one subprocess at a time, no retries, no
//!   partial resume. A new timestamped folder and archive are produced
//!   on every run.

pub mod archive;
pub mod backup;
pub mod cli;
pub mod credentials;
pub mod error;
pub mod item;
pub mod session;

pub use credentials::{CredentialArgs, Credentials};
pub use error::{BackupError, Result};
pub use item::{Attachment, VaultItem};
pub use session::BwSession;
