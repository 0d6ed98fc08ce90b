//! Reaper configuration.
//!
//! Values come from an optional TOML file and are then overridden by
//! command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ReaperError, ReaperResult};

/// Default number of users fetched in a single directory request.
pub const DEFAULT_MAX_USERS: u32 = 2000;

/// Reaper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaperConfig {
    /// Server URL (e.g., http://localhost:8080).
    pub server_url: String,

    /// Context path Keycloak is served under (`/auth` on legacy distributions).
    pub context_path: String,

    /// Realm whose sessions are reconciled.
    pub realm: String,

    /// Realm holding the service client used for the token exchange.
    pub auth_realm: String,

    /// Maximum number of enabled users fetched per pass.
    pub max_users: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Report orphaned sessions without deleting them.
    pub dry_run: bool,

    /// Client credentials.
    pub auth: Option<AuthConfig>,
}

/// Client credentials for the token exchange.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Client ID.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            context_path: "/auth".to_string(),
            realm: "master".to_string(),
            auth_realm: "master".to_string(),
            max_users: DEFAULT_MAX_USERS,
            request_timeout_secs: 30,
            dry_run: false,
            auth: None,
        }
    }
}

impl ReaperConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing file that was
    /// named explicitly is an error.
    pub fn load(path: Option<&Path>) -> ReaperResult<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !config_path.exists() {
            if explicit {
                return Err(ReaperError::Config(format!(
                    "config file not found: {}",
                    config_path.display()
                )));
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            ReaperError::Config(format!("failed to read {}: {e}", config_path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML document.
    pub fn from_toml(content: &str) -> ReaperResult<Self> {
        toml::from_str(content)
            .map_err(|e| ReaperError::Config(format!("failed to parse config: {e}")))
    }

    /// Gets the default configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".keycloak").join("kc-reaper.toml"))
    }

    /// Sets the client credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthConfig {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        });
        self
    }

    /// Checks that the configuration can drive a reconciliation pass.
    pub fn validate(&self) -> ReaperResult<()> {
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| ReaperError::Config("client credentials are required".to_string()))?;
        if auth.client_id.is_empty() {
            return Err(ReaperError::Config("client_id must not be empty".to_string()));
        }
        if auth.client_secret.is_empty() {
            return Err(ReaperError::Config(
                "client_secret must not be empty".to_string(),
            ));
        }
        if self.realm.is_empty() || self.auth_realm.is_empty() {
            return Err(ReaperError::Config("realm must not be empty".to_string()));
        }
        if self.max_users == 0 {
            return Err(ReaperError::Config(
                "max_users must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL of the Keycloak HTTP API, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let server = self.server_url.trim_end_matches('/');
        let context = self.context_path.trim_matches('/');
        if context.is_empty() {
            server.to_string()
        } else {
            format!("{server}/{context}")
        }
    }

    /// Request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
