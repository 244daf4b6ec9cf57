//! Error types for the drive_archive crate.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::ApiErrorResponse;

/// Errors that can occur when talking to Google Drive or Cloud Storage.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No application default credentials found: {0}")]
    CredentialsUnavailable(String),

    #[error("Failed to read credentials file {path:?}: {source}")]
    CredentialsFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),

    #[error("Failed to initialize HTTP transport: {0}")]
    TransportInitializationError(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("No folder matching '{0}'")]
    FolderNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Move of {file_id} not applied, parents are now {parents:?}")]
    MoveNotApplied { file_id: String, parents: Vec<String> },

    #[error("{count} candidates match {what}, expected exactly one")]
    AmbiguousMatch { what: String, count: usize },

    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

/// Result type alias for Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error reasons Google reports when a write is refused for capacity.
const QUOTA_REASONS: &[&str] = &[
    "storageQuotaExceeded",
    "quotaExceeded",
    "teamDriveFileLimitExceeded",
    "numChildrenInNonRootLimitExceeded",
];

/// What a failed request was addressing, used to pick the error variant.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    /// A Drive file, folder or listing; the id is reported on 404.
    Drive(&'a str),
    /// A Cloud Storage bucket.
    Bucket(&'a str),
}

/// Map a non-success API response onto the error taxonomy.
pub(crate) fn classify(status: StatusCode, body: &str, target: Target<'_>) -> Error {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let (code, message) = match &parsed {
        Some(api) => (api.error.code, api.error.message.clone()),
        None => (status.as_u16(), body.to_string()),
    };
    let quota = parsed.as_ref().is_some_and(|api| {
        api.error
            .errors
            .iter()
            .any(|e| QUOTA_REASONS.contains(&e.reason.as_str()))
    });

    match (target, code) {
        (Target::Drive(_), 403) if quota => Error::QuotaExceeded(message),
        (Target::Drive(id), 404) => Error::FileNotFound(id.to_string()),
        (Target::Drive(_), 401 | 403) => Error::PermissionDenied(message),
        (Target::Bucket(bucket), 404) => Error::BucketNotFound(bucket.to_string()),
        (Target::Bucket(_), 401 | 403) => Error::AccessDenied(message),
        _ => Error::ApiError {
            status: code,
            message,
        },
    }
}

/// Pass a successful response through, or turn a failed one into an error.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    target: Target<'_>,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify(status, &body, target))
}
