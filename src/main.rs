//! drive_archive CLI - list bucket objects and publish files to Google Shared Drive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use drive_archive::client::DEFAULT_APPLICATION_NAME;
use drive_archive::{
    extract_id, publish, CredentialsConfig, DriveClient, DriveClientConfig, PublishConfig,
    Selection, StorageConfig, StorageLister, DRIVE_SCOPE, STORAGE_READ_SCOPE,
};

/// CLI tool for publishing files to Google Shared Drive.
#[derive(Parser)]
#[command(name = "drive_archive")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a credentials JSON file (service account or authorized user).
    /// Falls back to gcloud application-default credentials.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Application name sent to the Drive API.
    #[arg(long, env = "DRIVE_APP_NAME", default_value = DEFAULT_APPLICATION_NAME)]
    app_name: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List objects in a Cloud Storage bucket with their dimensions.
    Objects {
        /// Bucket name.
        bucket: String,
    },

    /// List shared drives visible to the credentials.
    Drives,

    /// Upload a file into a shared-drive folder, archiving any existing copy.
    Publish {
        /// Local file to upload.
        file: PathBuf,

        /// Shared Drive URL or ID to search.
        #[arg(long, env = "SHARED_DRIVE_ID")]
        drive_id: String,

        /// Text the target folder's name must contain.
        #[arg(long, env = "TARGET_FOLDER_NAME")]
        folder_name: String,

        /// Archive folder URL or ID that receives the replaced copy.
        #[arg(long, env = "ARCHIVE_FOLDER_ID")]
        archive_folder: String,

        /// How to choose among several matches: first or unique.
        #[arg(long, env = "SELECTION_POLICY", default_value = "first")]
        selection: Selection,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let credentials_config = CredentialsConfig {
        explicit_path: cli.credentials.clone(),
        ..CredentialsConfig::from_env()
    };
    let credentials = credentials_config
        .resolve()
        .context("Failed to resolve application default credentials")?;

    match cli.command {
        Commands::Objects { bucket } => {
            let lister = StorageLister::new(
                credentials.scoped(STORAGE_READ_SCOPE),
                StorageConfig::default(),
            )?;

            let objects = lister
                .list_objects(&bucket)
                .await
                .with_context(|| format!("Failed to list bucket: {}", bucket))?;

            if objects.is_empty() {
                println!("No objects found.");
            } else {
                for object in objects {
                    println!("{}", object);
                }
            }
        }

        Commands::Drives => {
            let client = drive_client(credentials, cli.app_name)?;
            let drives = client
                .list_shared_drives()
                .await
                .context("Failed to list shared drives")?;

            if drives.is_empty() {
                println!("No shared drives found.");
            } else {
                println!("{:<24} {}", "ID", "NAME");
                println!("{}", "-".repeat(60));
                for drive in drives {
                    println!("{}", drive);
                }
            }
        }

        Commands::Publish {
            file,
            drive_id,
            folder_name,
            archive_folder,
            selection,
        } => {
            let config = PublishConfig {
                drive_id: extract_id(&drive_id)
                    .with_context(|| format!("Invalid drive URL or ID: {}", drive_id))?,
                folder_name,
                archive_folder_id: extract_id(&archive_folder)
                    .with_context(|| format!("Invalid folder URL or ID: {}", archive_folder))?,
                local_file: file,
                selection,
            };

            let client = drive_client(credentials, cli.app_name)?;
            let outcome = publish(&client, &config)
                .await
                .with_context(|| format!("Failed to publish {:?}", config.local_file))?;

            if let Some(archived) = &outcome.archived {
                println!("Archived: {}", archived);
            }
            println!("File ID: {}", outcome.uploaded.id);
            println!("File Name: {}", outcome.uploaded.name);
        }
    }

    Ok(())
}

fn drive_client(
    credentials: drive_archive::Credentials,
    application_name: String,
) -> Result<DriveClient> {
    let config = DriveClientConfig {
        application_name,
        ..DriveClientConfig::default()
    };
    DriveClient::new(credentials.scoped(DRIVE_SCOPE), config)
        .context("Failed to build Drive client")
}
