//! Unified error type for the Bestbook client.

use bestbook_lifecycle::LifecycleError;
use bestbook_session::SessionError;

/// Top-level error for setup: session construction and lifecycle
/// configuration.
///
/// Token problems and sign-out failures never surface here; the lifecycle
/// layer turns them into state changes and log lines. Each variant is
/// `#[from]`, so `?` converts sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum BestbookError {
    /// A session record was incomplete.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Config loading or HTTP client setup failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
