//! Publish a local file into a shared-drive folder, archiving the copy it
//! replaces.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::client::{DriveClient, LocalFile};
use crate::error::{Error, Result};
use crate::models::{DriveFile, FOLDER_MIME_TYPE};
use crate::query::Query;

/// How to choose between several search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    /// Take the first result in the order Drive returns them.
    #[default]
    First,
    /// Fail with [`Error::AmbiguousMatch`] if more than one result matches.
    Unique,
}

impl Selection {
    /// Pick one item from `candidates`, or `None` if there are none.
    pub fn pick<T>(self, candidates: Vec<T>, what: &str) -> Result<Option<T>> {
        if self == Selection::Unique && candidates.len() > 1 {
            return Err(Error::AmbiguousMatch {
                what: what.to_string(),
                count: candidates.len(),
            });
        }
        Ok(candidates.into_iter().next())
    }
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Selection::First),
            "unique" => Ok(Selection::Unique),
            other => Err(format!("unknown selection policy '{}' (expected first or unique)", other)),
        }
    }
}

/// Where to publish and where replaced copies go.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Shared drive searched for the target folder.
    pub drive_id: String,
    /// Substring the target folder's name must contain.
    pub folder_name: String,
    /// Folder that receives the replaced copy.
    pub archive_folder_id: String,
    /// Local file to upload.
    pub local_file: PathBuf,
    pub selection: Selection,
}

/// What a publish run did.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub folder: DriveFile,
    /// The previous copy after it was moved, if there was one.
    pub archived: Option<DriveFile>,
    pub uploaded: DriveFile,
}

/// Run the publish workflow.
///
/// Steps run strictly in order and the first error ends the run. The local
/// file is opened before any remote call, so an unreadable file never leaves
/// an archived copy without its replacement. Once the target folder is found
/// the upload always happens, whether or not an older copy was archived.
pub async fn publish(client: &DriveClient, config: &PublishConfig) -> Result<PublishOutcome> {
    let local = LocalFile::open(&config.local_file).await?;
    let file_name = local.name().to_string();

    info!("Searching for shared drives");
    let drives = client.list_shared_drives().await?;
    let names: Vec<&str> = drives.iter().map(|d| d.name.as_str()).collect();
    info!(count = drives.len(), drives = ?names, "shared drives visible");

    info!(drive_id = %config.drive_id, folder_name = %config.folder_name, "looking for target folder");
    let folder_query = Query::new()
        .mime_type(FOLDER_MIME_TYPE)
        .name_contains(&config.folder_name);
    let folders: Vec<DriveFile> = client
        .find_files(&config.drive_id, &folder_query)
        .await?
        .into_iter()
        .filter(DriveFile::is_folder)
        .collect();
    info!(count = folders.len(), "matching folders");
    for folder in &folders {
        info!(%folder, "candidate folder");
    }

    let folder = config
        .selection
        .pick(folders, &format!("folder '{}'", config.folder_name))?
        .ok_or_else(|| Error::FolderNotFound(config.folder_name.clone()))?;

    let existing_query = Query::new()
        .in_parents(&folder.id)
        .name_eq(&file_name)
        .not_trashed();
    let existing = client.find_files(&config.drive_id, &existing_query).await?;
    for file in &existing {
        info!(%file, "existing file");
    }

    let archived = match config
        .selection
        .pick(existing, &format!("file '{}'", file_name))?
    {
        Some(previous) => {
            info!(file = %file_name, archive = %config.archive_folder_id, "found existing copy, moving to archive");
            Some(
                client
                    .archive_file(&previous.id, &config.archive_folder_id)
                    .await?,
            )
        }
        None => {
            info!(file = %file_name, "file wasn't found, not archiving");
            None
        }
    };

    let uploaded = client.upload(local, &folder.id).await?;
    info!(id = %uploaded.id, name = %uploaded.name, "uploaded");

    Ok(PublishOutcome {
        folder,
        archived,
        uploaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_takes_service_order() {
        let picked = Selection::First.pick(vec!["a", "b"], "x").unwrap();
        assert_eq!(picked, Some("a"));
        assert_eq!(Selection::First.pick(Vec::<&str>::new(), "x").unwrap(), None);
    }

    #[test]
    fn test_unique_rejects_ambiguity() {
        let err = Selection::Unique.pick(vec![1, 2, 3], "folder 'Jezza'").unwrap_err();
        assert!(matches!(err, Error::AmbiguousMatch { count: 3, .. }));
        assert_eq!(Selection::Unique.pick(vec![7], "x").unwrap(), Some(7));
    }

    #[test]
    fn test_selection_from_str() {
        assert_eq!("first".parse::<Selection>().unwrap(), Selection::First);
        assert_eq!("Unique".parse::<Selection>().unwrap(), Selection::Unique);
        assert!("latest".parse::<Selection>().is_err());
    }
}
