//! drive_archive - publish files into Google Shared Drive folders.
//!
//! This library provides functionality to:
//! - Resolve application-default credentials and narrow them to one scope
//! - List Cloud Storage objects with their `dimensions` metadata
//! - Search shared drives, move files between folders and upload files
//! - Publish a file into a folder, archiving the copy it replaces
//!
//! # Example
//!
//! ```no_run
//! use drive_archive::{
//!     CredentialsConfig, DriveClient, DriveClientConfig, PublishConfig, Selection, DRIVE_SCOPE,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = CredentialsConfig::from_env().resolve()?.scoped(DRIVE_SCOPE);
//!     let client = DriveClient::new(auth, DriveClientConfig::default())?;
//!
//!     let config = PublishConfig {
//!         drive_id: "0AO5ageEAi854Uk9PVA".to_string(),
//!         folder_name: "Jezza".to_string(),
//!         archive_folder_id: "16DyU1zZSrxuJPchwC2_roOXMk9pNZAmG".to_string(),
//!         local_file: "temp.txt".into(),
//!         selection: Selection::First,
//!     };
//!     let outcome = drive_archive::publish(&client, &config).await?;
//!     println!("{}", outcome.uploaded);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod url_parser;
pub mod workflow;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::{DriveClient, DriveClientConfig, LocalFile};
pub use credentials::{Credentials, CredentialsConfig, DRIVE_SCOPE, STORAGE_READ_SCOPE};
pub use error::{Error, Result};
pub use models::{DriveFile, SharedDrive, StorageObjectSummary};
pub use query::Query;
pub use storage::{StorageConfig, StorageLister};
pub use url_parser::extract_id;
pub use workflow::{publish, PublishConfig, PublishOutcome, Selection};
