//! Orphaned session reconciliation.
//!
//! A pass walks every enabled user in directory order, lists the user's
//! sessions and deletes each session that has no client bound to it.
//! Failures never end a pass early: a failed lookup reads as "nothing to
//! do" and a failed deletion is logged and counted.

use std::sync::Arc;

use serde::Serialize;

use crate::api::AdminApi;
use crate::clock::Clock;
use crate::config::ReaperConfig;
use crate::directory::DirectoryClient;
use crate::error::{ReaperError, ReaperResult};
use crate::session::{orphaned, SessionClient};
use crate::token::TokenManager;

/// Counters collected during one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Users returned by the directory.
    pub users_scanned: usize,
    /// Sessions listed across all users.
    pub sessions_inspected: usize,
    /// Sessions without any client binding.
    pub orphans_found: usize,
    /// Orphaned sessions deleted.
    pub sessions_deleted: usize,
    /// Deletions rejected by the server or lost in transport.
    pub deletions_failed: usize,
    /// Orphaned sessions left alone because no token was available.
    pub deletions_skipped: usize,
}

/// Drives reconciliation passes against one realm.
pub struct Reconciler {
    tokens: TokenManager,
    directory: DirectoryClient,
    sessions: SessionClient,
    dry_run: bool,
}

impl Reconciler {
    /// Creates a reconciler from validated configuration.
    pub fn new(config: &ReaperConfig) -> ReaperResult<Self> {
        config.validate()?;
        let auth = config
            .auth
            .clone()
            .ok_or_else(|| ReaperError::Config("client credentials are required".to_string()))?;
        let api = AdminApi::new(config)
            .map_err(|e| ReaperError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            tokens: TokenManager::new(api.clone(), auth),
            directory: DirectoryClient::new(api.clone(), config.max_users),
            sessions: SessionClient::new(api),
            dry_run: config.dry_run,
        })
    }

    /// Replaces the time source used for token expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tokens = self.tokens.with_clock(clock);
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The token manager shared by every request of this reconciler.
    #[must_use]
    pub const fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Runs one reconciliation pass.
    pub async fn run(&mut self) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        let users = self.directory.list_enabled_users(&mut self.tokens).await;
        tracing::info!("Number of users: {}", users.len());

        for user in &users {
            summary.users_scanned += 1;
            tracing::info!(user_id = %user.id, "Checking sessions for user: {}", user.username);

            let sessions = self.sessions.list_sessions(&mut self.tokens, &user.id).await;
            summary.sessions_inspected += sessions.len();

            for session in orphaned(&sessions) {
                summary.orphans_found += 1;

                if self.dry_run {
                    tracing::info!(
                        user_id = %user.id,
                        ip_address = ?session.ip_address,
                        "Dry run: would delete orphaned session {}",
                        session.id
                    );
                    continue;
                }

                let token = match self.tokens.valid_token().await {
                    Ok(token) => token,
                    Err(_) => {
                        tracing::warn!("No access token, skipping session {}", session.id);
                        summary.deletions_skipped += 1;
                        continue;
                    }
                };

                match self.sessions.delete_session(&token, &session.id).await {
                    Ok(()) => {
                        summary.sessions_deleted += 1;
                        tracing::info!(
                            user_id = %user.id,
                            "Deleted orphaned session {}",
                            session.id
                        );
                    }
                    Err(_) => summary.deletions_failed += 1,
                }
            }
        }

        tracing::info!(
            users = summary.users_scanned,
            sessions = summary.sessions_inspected,
            orphans = summary.orphans_found,
            deleted = summary.sessions_deleted,
            failed = summary.deletions_failed,
            skipped = summary.deletions_skipped,
            "Session reconciliation finished"
        );

        summary
    }
}
