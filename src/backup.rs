//! Backup packaging: staging folder naming and the attachment
//! download loop.

use crate::session::BwSession;
use crate::{Result, VaultItem};
use chrono::{DateTime, Datelike, Local, Timelike};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

/// Directory inside the staging folder that holds attachments.
pub const ATTACHMENTS_DIR: &str = "attachments";

/// File name of the vault JSON export.
pub const EXPORT_FILE: &str = "export.json";

/// Counts reported after a download pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Items that carried attachments.
    pub items: usize,
    /// Attachments downloaded.
    pub attachments: usize,
}

/// Builds the timestamped staging folder name for a run.
///
/// Components are unpadded: midnight on new year 2024 yields
/// `bitwarden-backup-2024-1-1_0-0-0`.
pub fn backup_folder_name(now: DateTime<Local>) -> String {
    format!(
        "bitwarden-backup-{}-{}-{}_{}-{}-{}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Downloads every attachment in the vault into
/// `<folder>/attachments/<item name>/`, sequentially, behind a
/// 40-column progress bar.
///
/// Items without an attachments field are skipped. Any single failed
/// download aborts the pass.
pub async fn download_attachments(folder: &Path, session: &BwSession) -> Result<DownloadSummary> {
    println!("Getting all items...");
    let all_items = session.list_items().await?;

    let with_attachments: Vec<&VaultItem> =
        all_items.iter().filter(|i| i.has_attachments()).collect();
    let total: usize = with_attachments.iter().map(|i| i.attachment_count()).sum();

    info!(
        items = with_attachments.len(),
        attachments = total,
        "starting attachment download"
    );
    println!("Downloading {} attachments...", total);

    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("0% [{bar:40}] 100% ({pos}/{len})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░"),
    );

    for item in &with_attachments {
        let target = folder.join(ATTACHMENTS_DIR).join(&item.name);
        if let Some(attachments) = &item.attachments {
            for attachment in attachments {
                session.get_attachment(&item.id, attachment, &target).await?;
                bar.inc(1);
            }
        }
    }
    bar.finish();

    Ok(DownloadSummary {
        items: with_attachments.len(),
        attachments: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_folder_name_unpadded() {
        let now = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(backup_folder_name(now), "bitwarden-backup-2024-1-1_0-0-0");
    }

    #[test]
    fn test_backup_folder_name_full_timestamp() {
        let now = Local.with_ymd_and_hms(2023, 12, 31, 23, 59, 7).unwrap();
        assert_eq!(
            backup_folder_name(now),
            "bitwarden-backup-2023-12-31_23-59-7"
        );
    }
}
