//! Session types: the record a signed-in client carries around.
//!
//! A "session" here is the client's copy of what the server handed out at
//! sign-in:
//! - HOW to authenticate (a signed bearer token)
//! - WHICH server-side session that token belongs to (a correlation id)
//! - WHO is signed in (a profile for the header)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SessionError;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Display attributes for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub email: String,
    /// Avatar image reference. The sign-in payload calls it `profilePicture`.
    #[serde(default, rename = "profilePicture", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A bearer token paired with its server-assigned session id.
///
/// The token and the id travel together: there is no way to build a
/// `Session` with one and not the other, and clearing the store drops
/// both at once. Fields are private for that reason.
///
/// Deserializes from the flat sign-in payload:
///
/// ```json
/// { "token": "eyJ...", "sessionId": "s-1", "username": "ada",
///   "email": "ada@example.com", "profilePicture": "https://..." }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionPayload", into = "SessionPayload")]
pub struct Session {
    token: String,
    session_id: String,
    profile: Profile,
}

impl Session {
    /// Builds a session from the pieces returned by sign-in.
    ///
    /// # Errors
    /// [`SessionError::Incomplete`] if the token or the session id is empty.
    pub fn new(
        token: impl Into<String>,
        session_id: impl Into<String>,
        profile: Profile,
    ) -> Result<Self, SessionError> {
        let token = token.into();
        let session_id = session_id.into();
        if token.is_empty() {
            return Err(SessionError::Incomplete("token"));
        }
        if session_id.is_empty() {
            return Err(SessionError::Incomplete("session id"));
        }
        Ok(Self {
            token,
            session_id,
            profile,
        })
    }

    /// The bearer token. Never log this.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

/// Hand-written so the token never lands in logs via `{:?}`.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("session_id", &self.session_id)
            .field("profile", &self.profile)
            .finish()
    }
}

/// Wire shape of the sign-in payload.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    token: String,
    session_id: String,
    #[serde(flatten)]
    profile: Profile,
}

impl TryFrom<SessionPayload> for Session {
    type Error = SessionError;

    fn try_from(payload: SessionPayload) -> Result<Self, Self::Error> {
        Session::new(payload.token, payload.session_id, payload.profile)
    }
}

impl From<Session> for SessionPayload {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            session_id: session.session_id,
            profile: session.profile,
        }
    }
}
