//! Google Drive API client for Shared Drive operations.

use std::path::Path;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{Body, Client};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::auth::Authenticator;
use crate::error::{ensure_success, Error, Result, Target};
use crate::models::{
    format_size, DriveFile, DriveListResponse, FileListResponse, ParentsResponse, SharedDrive,
};
use crate::query::Query;

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Upload URL for Google Drive API.
pub const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Application name sent as the User-Agent.
pub const DEFAULT_APPLICATION_NAME: &str = "drive-archive";

/// Content type for uploaded bytes; Drive treats the file as opaque.
const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

const FILE_FIELDS: &str = "id, name, mimeType, parents";

/// Settings for [`DriveClient::new`].
#[derive(Debug, Clone)]
pub struct DriveClientConfig {
    pub application_name: String,
    pub api_base: String,
    pub upload_base: String,
}

impl Default for DriveClientConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            api_base: DRIVE_API_BASE.to_string(),
            upload_base: UPLOAD_API_BASE.to_string(),
        }
    }
}

/// Client for searching, moving and uploading files across shared drives.
///
/// Every request asks for all-drives semantics; without it Drive silently
/// leaves shared-drive items out of results and refuses to modify them.
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    api_base: String,
    upload_base: String,
}

impl DriveClient {
    /// Create a new DriveClient.
    ///
    /// # Arguments
    /// * `auth` - Authenticator scoped for Drive access
    /// * `config` - Application name and API endpoints
    pub fn new(auth: Authenticator, config: DriveClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.application_name)
            .build()
            .map_err(Error::TransportInitializationError)?;

        Ok(Self {
            auth,
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
        })
    }

    /// List every shared drive visible to the credentials.
    pub async fn list_shared_drives(&self) -> Result<Vec<SharedDrive>> {
        let token = self.auth.access_token().await?;
        let mut all_drives = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/drives", self.api_base))
                .bearer_auth(&token)
                .query(&[("fields", "nextPageToken, drives(id, name)")]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = ensure_success(request.send().await?, Target::Drive("drives")).await?;
            let page: DriveListResponse = response.json().await?;
            all_drives.extend(page.drives);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_drives)
    }

    /// Search a shared drive with a Drive query expression.
    ///
    /// Results keep the order the service returns them in.
    pub async fn find_files(&self, drive_id: &str, query: &Query) -> Result<Vec<DriveFile>> {
        let token = self.auth.access_token().await?;
        let q = query.to_string();
        let fields = format!("nextPageToken, files({})", FILE_FIELDS);
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        debug!(drive_id, q = %q, "searching files");

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.api_base))
                .bearer_auth(&token)
                .query(&[
                    ("q", q.as_str()),
                    ("driveId", drive_id),
                    ("corpora", "drive"),
                    ("includeItemsFromAllDrives", "true"),
                    ("supportsAllDrives", "true"),
                    ("fields", fields.as_str()),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = ensure_success(request.send().await?, Target::Drive(drive_id)).await?;
            let list_response: FileListResponse = response.json().await?;
            all_files.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_files)
    }

    /// Get the current parent folder ids of a file.
    pub async fn get_parents(&self, file_id: &str) -> Result<Vec<String>> {
        let token = self.auth.access_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[("fields", "parents"), ("supportsAllDrives", "true")])
            .send()
            .await?;

        let response = ensure_success(response, Target::Drive(file_id)).await?;
        let parents: ParentsResponse = response.json().await?;
        Ok(parents.parents)
    }

    /// Get a file's id, name, type and parents.
    pub async fn get_file(&self, file_id: &str) -> Result<DriveFile> {
        let token = self.auth.access_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[("fields", FILE_FIELDS), ("supportsAllDrives", "true")])
            .send()
            .await?;

        let response = ensure_success(response, Target::Drive(file_id)).await?;
        let file: DriveFile = response.json().await?;
        Ok(file)
    }

    /// Move a file into `to_folder_id`, removing it from every folder in
    /// `from_parents`, in a single update.
    ///
    /// `to_folder_id` is never sent for removal, even if it is already a
    /// parent. Returns the file as Drive reports it after the move.
    pub async fn move_file(
        &self,
        file_id: &str,
        from_parents: &[String],
        to_folder_id: &str,
    ) -> Result<DriveFile> {
        let token = self.auth.access_token().await?;
        let remove_parents = from_parents
            .iter()
            .filter(|p| p.as_str() != to_folder_id)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut request = self
            .http
            .patch(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[
                ("addParents", to_folder_id),
                ("supportsAllDrives", "true"),
                ("fields", FILE_FIELDS),
            ]);

        if !remove_parents.is_empty() {
            request = request.query(&[("removeParents", remove_parents.as_str())]);
        }

        let response = request.json(&serde_json::json!({})).send().await?;

        let response = ensure_success(response, Target::Drive(file_id)).await?;
        let moved: DriveFile = response.json().await?;
        Ok(moved)
    }

    /// Move a file out of all its current folders into `archive_folder_id`.
    ///
    /// The parents are fetched again after the update; the move only counts
    /// if the archive folder is then the file's sole parent.
    pub async fn archive_file(&self, file_id: &str, archive_folder_id: &str) -> Result<DriveFile> {
        let former_parents = self.get_parents(file_id).await?;
        info!(file_id, former_parents = %former_parents.join(","), "archiving file");
        self.move_file(file_id, &former_parents, archive_folder_id)
            .await?;

        let archived = self.get_file(file_id).await?;
        if archived.parents != [archive_folder_id] {
            return Err(Error::MoveNotApplied {
                file_id: file_id.to_string(),
                parents: archived.parents,
            });
        }
        Ok(archived)
    }

    /// Upload a local file into a folder as an opaque octet stream.
    ///
    /// # Arguments
    /// * `local_path` - Path to the local file
    /// * `parent_id` - ID of the destination folder
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        local_path: P,
        parent_id: &str,
    ) -> Result<DriveFile> {
        let local = LocalFile::open(local_path).await?;
        self.upload(local, parent_id).await
    }

    /// Upload an already opened local file into a folder.
    ///
    /// The bytes are streamed through a resumable upload session, so the file
    /// is never held in memory whole.
    pub async fn upload(&self, local: LocalFile, parent_id: &str) -> Result<DriveFile> {
        let LocalFile { name, file, size } = local;
        info!(
            file = %name,
            size = %format_size(size),
            folder = parent_id,
            "uploading"
        );

        let token = self.auth.access_token().await?;
        let upload_url = self
            .start_upload_session(&token, &name, parent_id, size)
            .await?;

        let response = self
            .http
            .put(&upload_url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
            .header(CONTENT_LENGTH, size)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        let response = ensure_success(response, Target::Drive(parent_id)).await?;
        let created: DriveFile = response.json().await?;
        Ok(created)
    }

    /// Initiate a resumable upload and return the session URL.
    async fn start_upload_session(
        &self,
        token: &str,
        filename: &str,
        parent_id: &str,
        file_size: u64,
    ) -> Result<String> {
        let metadata = serde_json::json!({
            "name": filename,
            "parents": [parent_id]
        });

        let response = self
            .http
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(token)
            .query(&[
                ("uploadType", "resumable"),
                ("supportsAllDrives", "true"),
                ("fields", FILE_FIELDS),
            ])
            .header("X-Upload-Content-Type", UPLOAD_CONTENT_TYPE)
            .header("X-Upload-Content-Length", file_size)
            .json(&metadata)
            .send()
            .await?;

        let response = ensure_success(response, Target::Drive(parent_id)).await?;

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::ApiError {
                status: response.status().as_u16(),
                message: "No upload URL in response".to_string(),
            })
    }
}

/// A local file opened for upload, with the name and size it is sent under.
#[derive(Debug)]
pub struct LocalFile {
    name: String,
    file: File,
    size: u64,
}

impl LocalFile {
    /// Open `path` for reading. A path without a file name is `FileNotFound`;
    /// a missing or unreadable file is `Io`.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::FileNotFound(path.display().to_string()))?
            .to_string();

        let file = File::open(path).await?;
        let size = file.metadata().await?.len();
        Ok(Self { name, file, size })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
