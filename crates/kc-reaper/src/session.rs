//! User session (SSO session) lookups and removal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::AdminApi;
use crate::error::{ReaperError, ReaperResult};
use crate::token::{AccessToken, TokenManager};

/// Snapshot of a user session as reported by the admin API.
///
/// Only `id` and the client bindings drive reconciliation; the remaining
/// fields are carried for log output. Bindings are `None` when the server
/// sent no `clients` map, which never counts as orphaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session ID.
    pub id: String,

    /// Clients bound to this session, keyed by client UUID.
    #[serde(rename = "clients", default)]
    pub client_bindings: Option<HashMap<String, String>>,

    /// Username of the session owner.
    #[serde(default)]
    pub username: Option<String>,

    /// IP address the session was started from.
    #[serde(default)]
    pub ip_address: Option<String>,

    /// Session start, epoch milliseconds.
    #[serde(default)]
    pub start: Option<i64>,

    /// Last access, epoch milliseconds.
    #[serde(default)]
    pub last_access: Option<i64>,
}

impl Session {
    /// Creates a session snapshot with the given client bindings.
    #[must_use]
    pub fn new(id: impl Into<String>, client_bindings: HashMap<String, String>) -> Self {
        Self {
            id: id.into(),
            client_bindings: Some(client_bindings),
            username: None,
            ip_address: None,
            start: None,
            last_access: None,
        }
    }

    /// Checks if the session carries an empty client binding map.
    #[must_use]
    pub fn is_orphaned(&self) -> bool {
        self.client_bindings.as_ref().is_some_and(HashMap::is_empty)
    }
}

/// Yields the orphaned sessions of `sessions`, in order.
pub fn orphaned(sessions: &[Session]) -> impl Iterator<Item = &Session> {
    sessions.iter().filter(|s| s.is_orphaned())
}

fn user_sessions_path(user_id: &str) -> String {
    format!("/users/{}/sessions", urlencoding::encode(user_id))
}

fn session_path(session_id: &str) -> String {
    format!("/sessions/{}", urlencoding::encode(session_id))
}

/// Lists and deletes user sessions through the admin API.
#[derive(Debug, Clone)]
pub struct SessionClient {
    api: AdminApi,
}

impl SessionClient {
    /// Creates a new session client.
    #[must_use]
    pub const fn new(api: AdminApi) -> Self {
        Self { api }
    }

    /// Lists a user's sessions, or nothing if the lookup fails.
    pub async fn list_sessions(&self, tokens: &mut TokenManager, user_id: &str) -> Vec<Session> {
        match self.fetch_sessions(tokens, user_id).await {
            Ok(sessions) => sessions,
            Err(e) => {
                if !e.is_auth() {
                    tracing::error!("Error getting user sessions for user {}: {}", user_id, e);
                }
                Vec::new()
            }
        }
    }

    /// Lists a user's sessions, reporting failures to the caller.
    pub async fn fetch_sessions(
        &self,
        tokens: &mut TokenManager,
        user_id: &str,
    ) -> ReaperResult<Vec<Session>> {
        let token = tokens.valid_token().await?;
        self.api
            .get(&user_sessions_path(user_id), &[], token.value())
            .await
            .map_err(|source| ReaperError::SessionRead {
                user_id: user_id.to_string(),
                source,
            })
    }

    /// Deletes a session.
    ///
    /// Failures are logged and returned; nothing is retried.
    pub async fn delete_session(&self, token: &AccessToken, session_id: &str) -> ReaperResult<()> {
        match self.api.delete(&session_path(session_id), token.value()).await {
            Ok(()) => Ok(()),
            Err(source) => {
                tracing::error!("Error deleting session {}: {}", session_id, source);
                if source.is_unauthorized() {
                    tracing::warn!("Access token rejected before its expiry time");
                }
                Err(ReaperError::SessionDelete {
                    session_id: session_id.to_string(),
                    source,
                })
            }
        }
    }
}
