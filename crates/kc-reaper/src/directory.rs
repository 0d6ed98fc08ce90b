//! User directory lookups.

use serde::{Deserialize, Serialize};

use crate::api::AdminApi;
use crate::error::{ReaperError, ReaperResult};
use crate::token::TokenManager;

/// Snapshot of an enabled realm user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: String,
    /// Username.
    #[serde(default)]
    pub username: String,
}

/// Lists users through the admin API.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    api: AdminApi,
    max_users: u32,
}

impl DirectoryClient {
    /// Creates a directory client returning at most `max_users` users per call.
    #[must_use]
    pub const fn new(api: AdminApi, max_users: u32) -> Self {
        Self { api, max_users }
    }

    /// Lists enabled users, or nothing if the lookup fails.
    ///
    /// Failures are logged here; callers only see an empty list.
    pub async fn list_enabled_users(&self, tokens: &mut TokenManager) -> Vec<User> {
        match self.fetch_enabled_users(tokens).await {
            Ok(users) => users,
            Err(e) => {
                // token failures were already reported by the token manager
                if !e.is_auth() {
                    tracing::error!("Error getting users: {}", e);
                }
                Vec::new()
            }
        }
    }

    /// Lists enabled users, reporting failures to the caller.
    pub async fn fetch_enabled_users(&self, tokens: &mut TokenManager) -> ReaperResult<Vec<User>> {
        let token = tokens.valid_token().await?;
        let query = [
            ("max", self.max_users.to_string()),
            ("enabled", "true".to_string()),
        ];
        self.api
            .get("/users", &query, token.value())
            .await
            .map_err(ReaperError::Directory)
    }
}
