//! # kc-reaper
//!
//! Orphaned SSO session cleanup for Keycloak realms.
//!
//! This crate walks the enabled users of a realm through the admin REST API
//! and deletes every user session that is no longer bound to any client
//! application. All calls are authorized with a service-account token that
//! is obtained through the client-credentials grant and refreshed when it
//! expires.
//!
//! Requests are issued one at a time; a pass never stops early because of a
//! failed request.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod api;
pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod reconciler;
pub mod session;
pub mod token;

pub use api::AdminApi;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AuthConfig, ReaperConfig};
pub use directory::{DirectoryClient, User};
pub use error::{ApiError, ReaperError, ReaperResult};
pub use reconciler::{ReconcileSummary, Reconciler};
pub use session::{Session, SessionClient};
pub use token::{AccessToken, TokenManager};
