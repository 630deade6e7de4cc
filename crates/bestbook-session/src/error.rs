//! Error types for the session layer.

/// Errors raised while building a [`Session`](crate::Session).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A session needs both a token and a session id. Having only one of
    /// them is not a session, so we refuse to build it.
    #[error("session is missing its {0}")]
    Incomplete(&'static str),
}
