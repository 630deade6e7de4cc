//! Authenticated-session lifecycle for Bestbook.
//!
//! Keeps the client honest about its bearer token: it re-checks the stored
//! session on a timer, notices when the token has expired or the server
//! has rotated the session, and signs the user out exactly once no matter
//! how many things ask for it at the same time.
//!
//! # Key types
//!
//! - [`SessionMonitor`] / [`MonitorHandle`]: the recurring check, tied to
//!   the lifetime of whatever view mounted it
//! - [`SignoutCoordinator`]: collapses concurrent sign-out triggers into
//!   one sequence (notify server, clear store, navigate)
//! - [`MonitorState`] / [`MonitorStatus`]: what the header should show
//! - [`SignoutClient`] / [`HttpSignoutClient`]: the server notification
//! - [`Navigator`]: the routing primitive, supplied by the host app
//! - [`LifecycleConfig`]: intervals, delays, routes
//!
//! # Flow
//!
//! ```text
//! tick ─→ validate(snapshot) ─┬─ Valid ─────────────→ MonitorState::Valid
//!                             └─ Expired/Mismatch/
//!                                Malformed ─→ MonitorState::Expired
//!                                             + trigger_automatic()
//! user click ─────────────────────────────────→ trigger_user()
//!                                                    │
//!                        (first trigger wins) ←──────┘
//!                  notify server · clear store · navigate once
//! ```

mod client;
mod config;
mod coordinator;
mod error;
mod monitor;
mod navigate;
mod state;

pub use client::{HttpSignoutClient, SignoutClient};
pub use config::LifecycleConfig;
pub use coordinator::{SignoutCoordinator, SignoutOutcome};
pub use error::{LifecycleError, SignoutError};
pub use monitor::{Clock, MonitorHandle, SessionMonitor};
pub use navigate::Navigator;
pub use state::{MonitorState, MonitorStatus};
