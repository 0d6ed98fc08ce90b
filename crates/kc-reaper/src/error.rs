//! Reaper error types.

use thiserror::Error;

/// Failure of a single admin API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, or a response body that could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },
}

impl ApiError {
    /// Returns the HTTP status code, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
        }
    }

    /// Checks whether the server rejected the bearer token.
    ///
    /// Rejections are not retried; the next request refreshes only once the
    /// cached token has reached its expiry time.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Errors produced while reconciling sessions.
#[derive(Debug, Error)]
pub enum ReaperError {
    /// The client-credentials exchange failed; no token is available.
    #[error("token exchange failed: {0}")]
    Auth(#[source] ApiError),

    /// Listing users failed.
    #[error("failed to list users: {0}")]
    Directory(#[source] ApiError),

    /// Listing a user's sessions failed.
    #[error("failed to list sessions for user {user_id}: {source}")]
    SessionRead {
        /// User whose sessions were requested.
        user_id: String,
        /// Underlying request failure.
        #[source]
        source: ApiError,
    },

    /// Deleting a session failed.
    #[error("failed to delete session {session_id}: {source}")]
    SessionDelete {
        /// Session that could not be deleted.
        session_id: String,
        /// Underlying request failure.
        #[source]
        source: ApiError,
    },

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ReaperError {
    /// Checks if this error means no access token could be obtained.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Result type for reaper operations.
pub type ReaperResult<T> = Result<T, ReaperError>;
