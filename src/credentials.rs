//! Application-default credential resolution.
//!
//! Lookup order mirrors the Google client libraries: an explicitly named
//! credentials file first, then the file `gcloud auth application-default login`
//! writes. The process environment is only consulted by
//! [`CredentialsConfig::from_env`]; [`CredentialsConfig::resolve`] works purely
//! on the paths it was given.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use crate::models::{AuthorizedUserCredentials, ServiceAccountCredentials};

/// Google Drive read/write scope.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Cloud Storage read-only scope.
pub const STORAGE_READ_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

/// Default Google OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Environment variable naming an explicit credentials file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// A parsed credentials file, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    ServiceAccount(ServiceAccountCredentials),
    AuthorizedUser(AuthorizedUserCredentials),
}

impl Credentials {
    /// Load credentials from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::CredentialsFileError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Narrow these credentials to a single OAuth scope.
    pub fn scoped(self, scope: &str) -> Authenticator {
        Authenticator::new(self, scope)
    }

    /// Token endpoint these credentials exchange against.
    pub fn token_uri(&self) -> &str {
        let uri = match self {
            Credentials::ServiceAccount(sa) => sa.token_uri.as_deref(),
            Credentials::AuthorizedUser(user) => user.token_uri.as_deref(),
        };
        uri.unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// Human-readable identity, for logs.
    pub fn principal(&self) -> &str {
        match self {
            Credentials::ServiceAccount(sa) => &sa.client_email,
            Credentials::AuthorizedUser(user) => &user.client_id,
        }
    }
}

/// Where to look for application-default credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsConfig {
    /// Explicit credentials file; a failure to load it is never skipped.
    pub explicit_path: Option<PathBuf>,
    /// The gcloud well-known file, used only if it exists.
    pub well_known_path: Option<PathBuf>,
}

impl CredentialsConfig {
    /// Build a config from `GOOGLE_APPLICATION_CREDENTIALS` and the gcloud
    /// configuration directory.
    pub fn from_env() -> Self {
        Self {
            explicit_path: std::env::var_os(CREDENTIALS_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            well_known_path: well_known_path(),
        }
    }

    /// Use `path` as the explicit credentials file.
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Resolve and load the credentials.
    pub fn resolve(&self) -> Result<Credentials> {
        if let Some(path) = &self.explicit_path {
            debug!(path = %path.display(), "loading explicit credentials");
            return Credentials::from_file(path);
        }

        match &self.well_known_path {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading gcloud application default credentials");
                Credentials::from_file(path)
            }
            _ => Err(Error::CredentialsUnavailable(format!(
                "set {} or run `gcloud auth application-default login`",
                CREDENTIALS_ENV
            ))),
        }
    }
}

/// Location of gcloud's application_default_credentials.json.
fn well_known_path() -> Option<PathBuf> {
    let config_dir = if cfg!(windows) {
        std::env::var_os("APPDATA").map(PathBuf::from)
    } else {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    }?;
    Some(
        config_dir
            .join("gcloud")
            .join("application_default_credentials.json"),
    )
}
