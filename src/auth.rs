//! OAuth2 access tokens for Google APIs.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::models::{AuthorizedUserCredentials, ServiceAccountCredentials, TokenResponse};

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Issues access tokens for one credential, restricted to one scope.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<Credentials>,
    scope: String,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create a new authenticator for `scope`.
    pub fn new(credentials: Credentials, scope: &str) -> Self {
        Self {
            credentials: Arc::new(credentials),
            scope: scope.to_string(),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                // Add 60 second buffer before expiration
                let buffer = Duration::from_secs(60);
                if token.expires_at > SystemTime::now() + buffer {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    async fn refresh_token(&self) -> Result<CachedToken> {
        let token_uri = self.credentials.token_uri();
        debug!(principal = self.credentials.principal(), scope = %self.scope, "refreshing access token");

        let request = match self.credentials.as_ref() {
            Credentials::ServiceAccount(sa) => {
                let jwt = self.jwt_assertion(sa, token_uri)?;
                self.client.post(token_uri).form(&[
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                    ("assertion", jwt.as_str()),
                ])
            }
            Credentials::AuthorizedUser(user) => self.refresh_grant(user, token_uri),
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }

    /// Sign a JWT-bearer assertion for a service account.
    fn jwt_assertion(&self, sa: &ServiceAccountCredentials, token_uri: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::TokenRefreshError(e.to_string()))?
            .as_secs();

        let claims = Claims {
            iss: sa.client_email.clone(),
            scope: self.scope.clone(),
            aud: token_uri.to_string(),
            iat: now,
            exp: now + 3600, // 1 hour
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(sa.private_key.as_bytes())?;
        Ok(encode(&header, &claims, &key)?)
    }

    fn refresh_grant(
        &self,
        user: &AuthorizedUserCredentials,
        token_uri: &str,
    ) -> reqwest::RequestBuilder {
        self.client.post(token_uri).form(&[
            ("grant_type", "refresh_token"),
            ("client_id", user.client_id.as_str()),
            ("client_secret", user.client_secret.as_str()),
            ("refresh_token", user.refresh_token.as_str()),
            ("scope", self.scope.as_str()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::DRIVE_SCOPE;

    #[test]
    fn test_claims_serialization() {
        let claims = Claims {
            iss: "test@example.iam.gserviceaccount.com".to_string(),
            scope: DRIVE_SCOPE.to_string(),
            aud: "https://oauth2.googleapis.com/token".to_string(),
            iat: 1234567890,
            exp: 1234571490,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("test@example.iam.gserviceaccount.com"));
        assert!(json.contains(DRIVE_SCOPE));
    }

    #[tokio::test]
    async fn test_invalid_private_key_is_jwt_error() {
        let creds = Credentials::ServiceAccount(ServiceAccountCredentials {
            client_email: "bot@example.iam.gserviceaccount.com".to_string(),
            private_key: "not a pem".to_string(),
            token_uri: None,
        });
        let auth = creds.scoped(DRIVE_SCOPE);
        assert!(matches!(auth.access_token().await, Err(Error::JwtError(_))));
    }
}
