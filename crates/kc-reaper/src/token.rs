//! Access token lifecycle.
//!
//! The [`TokenManager`] holds the single admin access token used by every
//! API call and refreshes it through the client-credentials grant once the
//! wall clock reaches its expiry time. No safety margin is applied: a token
//! is reused up to the instant it expires.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::api::AdminApi;
use crate::clock::{Clock, SystemClock};
use crate::config::AuthConfig;
use crate::error::{ReaperError, ReaperResult};

/// A bearer access token and the time it stops being valid.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token that expires at `expires_at`.
    #[must_use]
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// The raw bearer value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Expiry time.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Checks if the token is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Owner of the current access token.
pub struct TokenManager {
    api: AdminApi,
    auth: AuthConfig,
    clock: Arc<dyn Clock>,
    current: Option<AccessToken>,
}

impl TokenManager {
    /// Creates a manager with no token; the first request performs an exchange.
    #[must_use]
    pub fn new(api: AdminApi, auth: AuthConfig) -> Self {
        Self {
            api,
            auth,
            clock: Arc::new(SystemClock),
            current: None,
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The cached token, whether or not it is still valid.
    #[must_use]
    pub fn current(&self) -> Option<&AccessToken> {
        self.current.as_ref()
    }

    /// Returns the cached token, refreshing it first if absent or expired.
    pub async fn valid_token(&mut self) -> ReaperResult<AccessToken> {
        let now = self.clock.now();
        match &self.current {
            Some(token) if !token.is_expired_at(now) => Ok(token.clone()),
            _ => self.refresh().await,
        }
    }

    /// Exchanges the client credentials for a new token.
    ///
    /// On failure the previously cached token, if any, is kept as is.
    pub async fn refresh(&mut self) -> ReaperResult<AccessToken> {
        let response = match self
            .api
            .client_credentials(&self.auth.client_id, &self.auth.client_secret)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error getting access token: {}", e);
                return Err(ReaperError::Auth(e));
            }
        };

        let expires_at = expiry_after(self.clock.now(), response.expires_in);
        let token = AccessToken::new(response.access_token, expires_at);
        tracing::debug!(expires_at = %expires_at, "Access token refreshed");

        self.current = Some(token.clone());
        Ok(token)
    }
}

/// Adds a provider-reported lifetime to `issued_at`.
///
/// Lifetimes beyond the representable range saturate instead of overflowing.
fn expiry_after(issued_at: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .unwrap_or(if expires_in > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            issued_at
        })
}
