//! Server notification for sign-out.
//!
//! The server keeps its own session table; telling it about a sign-out
//! lets it revoke the session id right away instead of waiting for the
//! token to expire. The call is best-effort: the client forgets its
//! credentials whether or not this succeeds.

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use crate::{LifecycleConfig, LifecycleError, SignoutError};

/// Header carrying the server-assigned session id.
pub const SESSION_ID_HEADER: &str = "Session-ID";

/// Notifies the server that a session is ending.
///
/// Implemented by [`HttpSignoutClient`] in production and by recording
/// doubles in tests.
pub trait SignoutClient: Send + Sync + 'static {
    /// Sends the sign-out request for `token` / `session_id`.
    ///
    /// # Errors
    /// [`SignoutError`] if the request could not be delivered or the
    /// server rejected it. Callers log and move on.
    fn sign_out(
        &self,
        token: &str,
        session_id: &str,
    ) -> impl Future<Output = Result<(), SignoutError>> + Send;
}

// ---------------------------------------------------------------------------
// HttpSignoutClient
// ---------------------------------------------------------------------------

/// `POST {base_url}{signout_path}` over `reqwest`.
///
/// Sends `Authorization: Bearer <token>` and `Session-ID: <session id>`
/// with an empty body.
#[derive(Debug, Clone)]
pub struct HttpSignoutClient {
    http: reqwest::Client,
    endpoint: String,
}

/// Error body the API returns on failure.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpSignoutClient {
    /// Builds a client for the API rooted at `base_url`.
    ///
    /// # Errors
    /// [`LifecycleError::HttpClient`] if the TLS backend fails to initialize.
    pub fn new(base_url: &str, config: &LifecycleConfig) -> Result<Self, LifecycleError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(LifecycleError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                config.signout_path
            ),
        })
    }

    /// The full URL requests go to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SignoutClient for HttpSignoutClient {
    async fn sign_out(&self, token: &str, session_id: &str) -> Result<(), SignoutError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .header(SESSION_ID_HEADER, session_id)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(session_id, status = status.as_u16(), "server acknowledged sign-out");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        Err(SignoutError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
