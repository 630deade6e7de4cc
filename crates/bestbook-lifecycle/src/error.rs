//! Error types for the lifecycle layer.

/// The sign-out notification failed.
///
/// Never fatal: the coordinator logs it and clears local state anyway,
/// because what matters is that the client stops presenting the token.
#[derive(Debug, thiserror::Error)]
pub enum SignoutError {
    /// The request never got a response (DNS, connect, timeout, ...).
    #[error("sign-out request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("sign-out rejected with {status}: {message}")]
    Status {
        status: u16,
        /// The `message` field of the JSON error body, or the raw body.
        message: String,
    },
}

/// Errors while setting up the lifecycle layer.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The configuration could not be read.
    #[error("config file unreadable: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration is not valid JSON for [`LifecycleConfig`](crate::LifecycleConfig).
    #[error("config is invalid: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The HTTP client could not be built.
    #[error("http client setup failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}
