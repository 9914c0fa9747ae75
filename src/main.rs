//! Binary entry point: the linear backup run.

use bwbackup::{archive, backup, BwSession, CredentialArgs, Credentials, Result};
use chrono::Local;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroize;

/// One-shot encrypted backup of a Bitwarden vault.
#[derive(Parser, Debug)]
#[command(name = "bwbackup", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    credentials: CredentialArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{}", err);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let credentials = Credentials::acquire(cli.credentials)?;
    // The master password doubles as the archive password and is
    // needed after the session consumed the credentials.
    let mut archive_password = credentials.master_password.clone();

    let folder = PathBuf::from(backup::backup_folder_name(Local::now()));

    println!("Logging into your vault...");
    let mut session = BwSession::open(credentials).await?;
    println!("                                   done.");

    backup::download_attachments(&folder, &session).await?;

    step("Creating json vault export...")?;
    session
        .export_vault(backup::EXPORT_FILE, &folder, "json")
        .await?;
    println!("      done.");

    step("Closing Bitwarden session...")?;
    session.end_session().await?;
    println!("       done.");

    step("Creating encrypted archive...")?;
    let archive_file = archive::archive_and_encrypt(&folder, &archive_password).await?;
    archive_password.zeroize();
    println!("      done.");

    step("Deleting temporary files...")?;
    archive::clean_up(&folder).await?;
    println!("        done.");

    println!(
        "\nALL DONE! Your backup is saved into '{}'\n",
        archive_file.display()
    );
    Ok(())
}

/// Prints a step label without a newline so "done." lands on the same line.
fn step(label: &str) -> Result<()> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(())
}
