//! Shared fixtures for tests that talk to a mocked Google API.

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};

use drive_archive::models::AuthorizedUserCredentials;
use drive_archive::{Authenticator, Credentials, DriveClient, DriveClientConfig, DRIVE_SCOPE};

pub const TOKEN: &str = "test-token";

/// Match `path` exactly, with or without a query string.
pub fn path(path: &str) -> Matcher {
    Matcher::Regex(format!(r"^{}(\?.*)?$", regex::escape(path)))
}

/// Answer token refreshes with [`TOKEN`].
pub async fn mock_token(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"access_token": "{}", "token_type": "Bearer", "expires_in": 3600}}"#,
            TOKEN
        ))
        .create_async()
        .await
}

/// Authorized-user credentials whose token endpoint is the mock server.
pub fn authenticator(server: &ServerGuard, scope: &str) -> Authenticator {
    Credentials::AuthorizedUser(AuthorizedUserCredentials {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        refresh_token: "refresh-token".to_string(),
        token_uri: Some(format!("{}/token", server.url())),
    })
    .scoped(scope)
}

pub fn drive_client(server: &ServerGuard) -> DriveClient {
    let config = DriveClientConfig {
        application_name: "drive-archive-tests".to_string(),
        api_base: format!("{}/drive/v3", server.url()),
        upload_base: format!("{}/upload/drive/v3", server.url()),
    };
    DriveClient::new(authenticator(server, DRIVE_SCOPE), config).unwrap()
}
