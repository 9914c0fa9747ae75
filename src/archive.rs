//! Encrypted 7z packing of the staging folder, and its removal.
//!
//! The archive uses the copy (store) codec chained with
//! AES-256/SHA-256 keyed by the master password. Header encryption is
//! enabled, so even the file listing is unreadable without the
//! password.

use crate::{BackupError, Result};
use sevenz_rust2::encoder_options::AesEncoderOptions;
use sevenz_rust2::{ArchiveWriter, EncoderMethod};
use std::path::{Path, PathBuf};
use tracing::info;

/// Path of the archive produced for a staging folder: `<folder>.7z`.
pub fn archive_path(folder: &Path) -> PathBuf {
    let mut name = folder.as_os_str().to_os_string();
    name.push(".7z");
    PathBuf::from(name)
}

/// Packs `folder` into an encrypted `<folder>.7z` and returns its path.
///
/// Archive writing is CPU/IO-bound and synchronous, so it runs on the
/// blocking thread pool.
pub async fn archive_and_encrypt(folder: &Path, password: &str) -> Result<PathBuf> {
    let dest = archive_path(folder);

    let src = folder.to_path_buf();
    let out = dest.clone();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || write_archive(&src, &out, &password))
        .await
        .map_err(|e| BackupError::Other(anyhow::anyhow!("archive task failed: {}", e)))??;

    info!(path = %dest.display(), "encrypted archive written");
    Ok(dest)
}

fn write_archive(folder: &Path, dest: &Path, password: &str) -> Result<()> {
    let mut writer = ArchiveWriter::create(dest)?;
    writer.set_content_methods(vec![
        AesEncoderOptions::new(password.into()).into(),
        EncoderMethod::COPY.into(),
    ]);
    writer.set_encrypt_header(true);
    writer.push_source_path(folder, |_| true)?;
    writer.finish()?;
    Ok(())
}

/// Recursively deletes the plaintext staging folder.
pub async fn clean_up(folder: &Path) -> Result<()> {
    tokio::fs::remove_dir_all(folder).await?;
    info!(path = %folder.display(), "staging folder removed");
    Ok(())
}
