//! HTTP plumbing for the Keycloak token endpoint and admin REST API.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ReaperConfig;
use crate::error::ApiError;

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: String,

    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Client for the Keycloak HTTP API of one realm.
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: reqwest::Client,
    base_url: String,
    realm: String,
    auth_realm: String,
}

impl AdminApi {
    /// Creates a new API client from configuration.
    pub fn new(config: &ReaperConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            realm: config.realm.clone(),
            auth_realm: config.auth_realm.clone(),
        })
    }

    /// Token endpoint of the auth realm.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, self.auth_realm
        )
    }

    /// Admin URL for a path under the managed realm.
    #[must_use]
    pub fn admin_url(&self, path: &str) -> String {
        format!("{}/admin/realms/{}{}", self.base_url, self.realm, path)
    }

    /// Exchanges client credentials for an access token.
    pub async fn client_credentials(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenResponse, ApiError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        let response = self
            .client
            .post(self.token_url())
            .form(&params)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Makes an authenticated GET request under the managed realm.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.admin_url(path))
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Makes an authenticated DELETE request under the managed realm.
    pub async fn delete(&self, path: &str, token: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.admin_url(path))
            .bearer_auth(token)
            .send()
            .await?;
        handle_empty_response(response).await
    }
}

/// Handles a response with a body.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        response.json().await.map_err(ApiError::Http)
    } else {
        Err(status_error(status, response).await)
    }
}

/// Handles a response without a body.
async fn handle_empty_response(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();

    if status.is_success() {
        Ok(())
    } else {
        Err(status_error(status, response).await)
    }
}

async fn status_error(status: reqwest::StatusCode, response: reqwest::Response) -> ApiError {
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
