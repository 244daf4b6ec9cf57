//! Cloud Storage object listing.

use std::time::Instant;

use reqwest::Client;
use tracing::debug;

use crate::auth::Authenticator;
use crate::error::{ensure_success, Error, Result, Target};
use crate::models::{ObjectListResponse, StorageObjectSummary};

/// Base URL for the Cloud Storage JSON API.
pub const STORAGE_API_BASE: &str = "https://storage.googleapis.com/storage/v1";

/// Connection settings for [`StorageLister`].
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub api_base: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_base: STORAGE_API_BASE.to_string(),
        }
    }
}

/// Lists objects in Cloud Storage buckets.
pub struct StorageLister {
    auth: Authenticator,
    http: Client,
    api_base: String,
}

impl StorageLister {
    pub fn new(auth: Authenticator, config: StorageConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(Error::TransportInitializationError)?;
        Ok(Self {
            auth,
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// List every object in `bucket` with its `dimensions` attribute.
    ///
    /// All result pages are fetched.
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<StorageObjectSummary>> {
        let started = Instant::now();
        let token = self.auth.access_token().await?;
        let mut summaries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/b/{}/o", self.api_base, bucket))
                .bearer_auth(&token)
                .query(&[("fields", "items(name,metadata),nextPageToken")]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = ensure_success(request.send().await?, Target::Bucket(bucket)).await?;
            let page: ObjectListResponse = response.json().await?;
            summaries.extend(page.items.into_iter().map(StorageObjectSummary::from));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            bucket,
            objects = summaries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "listed bucket"
        );
        Ok(summaries)
    }
}
