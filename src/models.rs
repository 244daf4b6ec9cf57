//! Data models for Google Drive and Cloud Storage API payloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Reported when an object carries no `dimensions` metadata.
pub const UNKNOWN_DIMENSIONS: &str = "(unknown)";

/// A file or folder in Google Drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
}

impl DriveFile {
    /// Whether Drive reports this entry as a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

impl std::fmt::Display for DriveFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parents = if self.parents.is_empty() {
            "-".to_string()
        } else {
            self.parents.join(",")
        };
        write!(f, "{}\t{}\t{}", self.id, parents, self.name)
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Response from files.get when only `parents` is requested.
#[derive(Debug, Deserialize)]
pub struct ParentsResponse {
    #[serde(default)]
    pub parents: Vec<String>,
}

/// Shared Drive metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharedDrive {
    pub id: String,
    pub name: String,
}

impl std::fmt::Display for SharedDrive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.id, self.name)
    }
}

/// Response from the drives.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveListResponse {
    #[serde(default)]
    pub drives: Vec<SharedDrive>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Name and `dimensions` attribute of a Cloud Storage object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObjectSummary {
    pub name: String,
    pub dimensions: String,
}

impl From<StorageObject> for StorageObjectSummary {
    fn from(object: StorageObject) -> Self {
        let dimensions = object
            .metadata
            .and_then(|mut m| m.remove("dimensions"))
            .unwrap_or_else(|| UNKNOWN_DIMENSIONS.to_string());
        Self {
            name: object.name,
            dimensions,
        }
    }
}

impl std::fmt::Display for StorageObjectSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.name, self.dimensions)
    }
}

/// Object resource from the Cloud Storage JSON API, reduced to what we read.
#[derive(Debug, Deserialize)]
pub struct StorageObject {
    pub name: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

/// Response from the objects.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectListResponse {
    #[serde(default)]
    pub items: Vec<StorageObject>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorReason>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorReason {
    #[serde(default)]
    pub reason: String,
}

/// Service account credentials from JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// User credentials written by `gcloud auth application-default login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub token_uri: Option<String>,
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_drive_file_deserialize() {
        let json = r#"{
            "id": "abc123",
            "name": "Jezza",
            "mimeType": "application/vnd.google-apps.folder",
            "parents": ["root1"]
        }"#;

        let file: DriveFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, "abc123");
        assert!(file.is_folder());
        assert_eq!(file.parents, vec!["root1".to_string()]);
    }

    #[test]
    fn test_drive_file_without_parents() {
        let file: DriveFile = serde_json::from_str(r#"{"id": "x", "name": "y"}"#).unwrap();
        assert!(file.parents.is_empty());
        assert!(!file.is_folder());
        assert_eq!(format!("{}", file), "x\t-\ty");
    }

    #[test]
    fn test_summary_uses_dimensions_metadata() {
        let object: StorageObject = serde_json::from_str(
            r#"{"name": "a.png", "metadata": {"dimensions": "800x600", "owner": "jezza"}}"#,
        )
        .unwrap();

        let summary = StorageObjectSummary::from(object);
        assert_eq!(summary.name, "a.png");
        assert_eq!(summary.dimensions, "800x600");
    }

    #[test]
    fn test_summary_sentinel_when_missing() {
        let no_metadata: StorageObject = serde_json::from_str(r#"{"name": "b.png"}"#).unwrap();
        assert_eq!(StorageObjectSummary::from(no_metadata).dimensions, UNKNOWN_DIMENSIONS);

        let other_keys: StorageObject =
            serde_json::from_str(r#"{"name": "c.png", "metadata": {"owner": "x"}}"#).unwrap();
        assert_eq!(StorageObjectSummary::from(other_keys).dimensions, "(unknown)");
    }
}
